use crate::{
    protocol::{AgentCapabilities, AgentCard},
    server::config::ServerConfig,
};

/// Agent card served at `/.well-known/agent-card.json`
///
/// Requests are answered synchronously, so streaming and push notifications
/// are advertised as unsupported.
pub fn build_agent_card(config: &ServerConfig) -> AgentCard {
    let card = AgentCard::new(&config.name, &config.description, AgentCapabilities::new())
        .with_version(&config.version)
        .with_url(config.public_url());

    config
        .skills
        .iter()
        .cloned()
        .fold(card, |card, skill| card.with_skill(skill))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_card_shape() {
        let config = ServerConfig::default()
            .with_name("Homelab Bridge")
            .with_bind("0.0.0.0", 10001);
        let card = serde_json::to_value(build_agent_card(&config)).unwrap();

        assert_eq!(card["name"], "Homelab Bridge");
        assert_eq!(card["url"], "http://localhost:10001");
        assert_eq!(
            card["capabilities"],
            json!({"streaming": false, "pushNotifications": false, "stateTransitionHistory": false})
        );
        assert_eq!(card["defaultInputModes"], json!(["text"]));
        assert_eq!(card["defaultOutputModes"], json!(["text"]));
        assert_eq!(card["skills"][0]["id"], "conversation");
        assert!(card["version"].is_string());
    }
}
