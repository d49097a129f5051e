use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of workspace item being synchronized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathType {
    Script,
    Flow,
    App,
    Folder,
    Resource,
    Variable,
    ResourceType,
    Schedule,
    User,
    Group,
    HttpTrigger,
    WebsocketTrigger,
    KafkaTrigger,
    NatsTrigger,
    PostgresTrigger,
    MqttTrigger,
    SqsTrigger,
    GcpTrigger,
    Settings,
    Key,
}

impl PathType {
    pub const ALL: [PathType; 20] = [
        PathType::Script,
        PathType::Flow,
        PathType::App,
        PathType::Folder,
        PathType::Resource,
        PathType::Variable,
        PathType::ResourceType,
        PathType::Schedule,
        PathType::User,
        PathType::Group,
        PathType::HttpTrigger,
        PathType::WebsocketTrigger,
        PathType::KafkaTrigger,
        PathType::NatsTrigger,
        PathType::PostgresTrigger,
        PathType::MqttTrigger,
        PathType::SqsTrigger,
        PathType::GcpTrigger,
        PathType::Settings,
        PathType::Key,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PathType::Script => "script",
            PathType::Flow => "flow",
            PathType::App => "app",
            PathType::Folder => "folder",
            PathType::Resource => "resource",
            PathType::Variable => "variable",
            PathType::ResourceType => "resourcetype",
            PathType::Schedule => "schedule",
            PathType::User => "user",
            PathType::Group => "group",
            PathType::HttpTrigger => "httptrigger",
            PathType::WebsocketTrigger => "websockettrigger",
            PathType::KafkaTrigger => "kafkatrigger",
            PathType::NatsTrigger => "natstrigger",
            PathType::PostgresTrigger => "postgrestrigger",
            PathType::MqttTrigger => "mqtttrigger",
            PathType::SqsTrigger => "sqstrigger",
            PathType::GcpTrigger => "gcptrigger",
            PathType::Settings => "settings",
            PathType::Key => "key",
        }
    }

    /// Glob selecting this item's files in the synced tree
    pub fn include_glob(&self, path: &str) -> String {
        include_glob(self.as_str(), path)
    }
}

/// Map an item kind and path to the glob of files the CLI writes for it.
///
/// Kinds without a dedicated file suffix match `<path>.*`.
pub fn include_glob(kind: &str, path: &str) -> String {
    match kind {
        "flow" => format!("{}.flow/*", path),
        "app" => format!("{}.app/*", path),
        "folder" => format!("{}/folder.meta.*", path),
        "resourcetype" => format!("{}.resource-type.*", path),
        "resource" => format!("{}.resource.*", path),
        "variable" => format!("{}.variable.*", path),
        "schedule" => format!("{}.schedule.*", path),
        "user" => format!("{}.user.*", path),
        "group" => format!("{}.group.*", path),
        trigger if trigger.ends_with("trigger") && trigger.len() > "trigger".len() => {
            let prefix = &trigger[..trigger.len() - "trigger".len()];
            format!("{}.{}_trigger.*", path, prefix)
        }
        _ => format!("{}.*", path),
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PathType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        PathType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| format!("Unknown path type: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_glob_per_kind() {
        let cases = [
            (PathType::Flow, "f/etl/load.flow/*"),
            (PathType::App, "f/etl/load.app/*"),
            (PathType::Folder, "f/etl/load/folder.meta.*"),
            (PathType::ResourceType, "f/etl/load.resource-type.*"),
            (PathType::Resource, "f/etl/load.resource.*"),
            (PathType::Variable, "f/etl/load.variable.*"),
            (PathType::Schedule, "f/etl/load.schedule.*"),
            (PathType::User, "f/etl/load.user.*"),
            (PathType::Group, "f/etl/load.group.*"),
            (PathType::HttpTrigger, "f/etl/load.http_trigger.*"),
            (PathType::WebsocketTrigger, "f/etl/load.websocket_trigger.*"),
            (PathType::KafkaTrigger, "f/etl/load.kafka_trigger.*"),
            (PathType::NatsTrigger, "f/etl/load.nats_trigger.*"),
            (PathType::PostgresTrigger, "f/etl/load.postgres_trigger.*"),
            (PathType::MqttTrigger, "f/etl/load.mqtt_trigger.*"),
            (PathType::SqsTrigger, "f/etl/load.sqs_trigger.*"),
            (PathType::GcpTrigger, "f/etl/load.gcp_trigger.*"),
            (PathType::Script, "f/etl/load.*"),
            (PathType::Settings, "f/etl/load.*"),
        ];
        for (kind, expected) in cases {
            assert_eq!(kind.include_glob("f/etl/load"), expected, "{kind}");
        }
    }

    #[test]
    fn test_unknown_kind_falls_back() {
        assert_eq!(include_glob("dashboard", "f/x"), "f/x.*");
        assert_eq!(include_glob("trigger", "f/x"), "f/x.*");
    }

    #[test]
    fn test_parse_round_trips_names() {
        for kind in PathType::ALL {
            assert_eq!(kind.as_str().parse::<PathType>().unwrap(), kind);
        }
        assert_eq!("HttpTrigger".parse::<PathType>().unwrap(), PathType::HttpTrigger);
        assert!("dashboard".parse::<PathType>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&PathType::ResourceType).unwrap();
        assert_eq!(json, "\"resourcetype\"");
        let parsed: PathType = serde_json::from_str("\"postgrestrigger\"").unwrap();
        assert_eq!(parsed, PathType::PostgresTrigger);
    }
}
