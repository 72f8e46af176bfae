use agency_config::{AgencyConfig, DatabaseConfig, PlanningConfig};

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &AgencyConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &AgencyConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.actor.is_configured() && has_single_underscore_key(&env_keys, "AGENCY_ACTOR") {
        warnings.push(
            "Actor config appears default while AGENCY_ACTOR* env vars exist. Use double underscores (example: AGENCY_ACTOR__USER_ID)."
                .to_string(),
        );
    }

    if config.database.path == DatabaseConfig::default().path
        && has_single_underscore_key(&env_keys, "AGENCY_DATABASE")
    {
        warnings.push(
            "Database config appears default while AGENCY_DATABASE* env vars exist. Use double underscores (example: AGENCY_DATABASE__PATH)."
                .to_string(),
        );
    }

    let planning_default = PlanningConfig::default();
    if config.planning.capacity_horizon_days == planning_default.capacity_horizon_days
        && config.planning.default_currency == planning_default.default_currency
        && has_single_underscore_key(&env_keys, "AGENCY_PLANNING")
    {
        warnings.push(
            "Planning config appears default while AGENCY_PLANNING* env vars exist. Use double underscores (example: AGENCY_PLANNING__CAPACITY_HORIZON_DAYS)."
                .to_string(),
        );
    }

    warnings
}

/// A key under `prefix` that does not use the `__` section separator.
fn has_single_underscore_key(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| {
        key.strip_prefix(prefix)
            .is_some_and(|rest| !rest.starts_with("__"))
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use agency_config::{ActorConfig, AgencyConfig};

    use super::collect_unconfigured_warnings;

    #[test]
    fn warns_for_single_underscore_keys() {
        let config = AgencyConfig::default();
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("AGENCY_ACTOR_USER_ID".to_string(), "usr-1".to_string()),
                ("AGENCY_DATABASE_PATH".to_string(), "/tmp/a.db".to_string()),
                (
                    "AGENCY_PLANNING_CAPACITY_HORIZON_DAYS".to_string(),
                    "14".to_string(),
                ),
            ],
        );

        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn does_not_warn_for_well_formed_keys() {
        let config = AgencyConfig::default();
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("AGENCY_ACTOR__USER_ID".to_string(), String::new()),
                ("AGENCY_LOG".to_string(), "debug".to_string()),
            ],
        );

        assert!(warnings.is_empty());
    }

    #[test]
    fn does_not_warn_when_actor_is_configured() {
        let config = AgencyConfig {
            actor: ActorConfig {
                user_id: "usr-1".to_string(),
            },
            ..Default::default()
        };
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![("AGENCY_ACTOR_USER_ID".to_string(), "usr-1".to_string())],
        );

        assert!(warnings.is_empty());
    }
}
