/// Argument list for one CLI invocation.
///
/// Empty values are dropped as they are pushed, so optional flags can be
/// appended unconditionally. The `--token` value is remembered as the
/// invocation's secret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WmillArgs {
    args: Vec<String>,
    secret: Option<usize>,
}

impl WmillArgs {
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::default().args(command)
    }

    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_string());
        }
        self
    }

    pub fn args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        args.into_iter().fold(self, |acc, arg| acc.arg(arg))
    }

    /// Append `flag` when `enabled`
    pub fn flag(self, flag: &str, enabled: bool) -> Self {
        if enabled {
            self.arg(flag)
        } else {
            self
        }
    }

    /// Append `name value` when a non-empty value is present
    pub fn option(self, name: &str, value: Option<&str>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => self.arg(name).arg(value),
            None => self,
        }
    }

    pub fn token(mut self, token: &str) -> Self {
        if token.is_empty() {
            return self;
        }
        self.args.push("--token".to_string());
        self.secret = Some(self.args.len());
        self.args.push(token.to_string());
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.args
    }

    /// Position of the token value, if one was added
    pub fn secret_position(&self) -> Option<usize> {
        self.secret
    }
}
