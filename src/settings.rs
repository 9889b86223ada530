use clap::ArgMatches;

/// Default number of parallel processes used by ansible-playbook. The
/// `--forks` flag is only forwarded when the configured value differs.
pub const ANSIBLE_FORKS_DEFAULT: u32 = 5;

/// Flat configuration record for a single run.
///
/// Populated once from CLI flags / `PLUGIN_*` environment variables and
/// passed by reference into the resolver, the command builders and the
/// runner. The `*_file` fields are derived at runtime by secret staging
/// and the playbook list is replaced in place by glob resolution.
#[derive(Debug, Clone)]
pub struct Settings {
    pub python_requirements: String,
    pub galaxy_requirements: String,
    pub inventories: Vec<String>,
    pub playbooks: Vec<String>,
    pub limit: String,
    pub skip_tags: String,
    pub start_at_task: String,
    pub tags: String,
    pub extra_vars: Vec<String>,
    pub module_path: Vec<String>,
    pub check: bool,
    pub diff: bool,
    pub flush_cache: bool,
    pub force_handlers: bool,
    pub list_hosts: bool,
    pub list_tags: bool,
    pub list_tasks: bool,
    pub syntax_check: bool,
    pub forks: u32,
    pub vault_id: String,
    pub vault_password: String,
    /// Path to the staged vault password file, set during execution.
    pub vault_password_file: String,
    pub verbose: u8,
    pub private_key: String,
    /// Path to the staged private key file, set during execution.
    pub private_key_file: String,
    pub user: String,
    pub connection: String,
    pub timeout: u32,
    pub ssh_common_args: String,
    pub sftp_extra_args: String,
    pub scp_extra_args: String,
    pub ssh_extra_args: String,
    pub is_become: bool, // renamed from 'become' to avoid Rust keyword
    pub become_method: String,
    pub become_user: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            python_requirements: String::new(),
            galaxy_requirements: String::new(),
            inventories: Vec::new(),
            playbooks: Vec::new(),
            limit: String::new(),
            skip_tags: String::new(),
            start_at_task: String::new(),
            tags: String::new(),
            extra_vars: Vec::new(),
            module_path: Vec::new(),
            check: false,
            diff: false,
            flush_cache: false,
            force_handlers: false,
            list_hosts: false,
            list_tags: false,
            list_tasks: false,
            syntax_check: false,
            forks: ANSIBLE_FORKS_DEFAULT,
            vault_id: String::new(),
            vault_password: String::new(),
            vault_password_file: String::new(),
            verbose: 0,
            private_key: String::new(),
            private_key_file: String::new(),
            user: String::new(),
            connection: String::new(),
            timeout: 0,
            ssh_common_args: String::new(),
            sftp_extra_args: String::new(),
            scp_extra_args: String::new(),
            ssh_extra_args: String::new(),
            is_become: false,
            become_method: String::new(),
            become_user: String::new(),
        }
    }
}

impl Settings {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let string = |id: &str| -> String {
            matches
                .get_one::<String>(id)
                .cloned()
                .unwrap_or_default()
        };
        let strings = |id: &str| -> Vec<String> {
            matches
                .get_many::<String>(id)
                .map(|values| values.cloned().collect())
                .unwrap_or_default()
        };

        Settings {
            python_requirements: string("python-requirements"),
            galaxy_requirements: string("galaxy-requirements"),
            inventories: strings("inventory"),
            playbooks: strings("playbook"),
            limit: string("limit"),
            skip_tags: string("skip-tags"),
            start_at_task: string("start-at-task"),
            tags: string("tags"),
            extra_vars: strings("extra-vars"),
            module_path: strings("module-path"),
            check: matches.get_flag("check"),
            diff: matches.get_flag("diff"),
            flush_cache: matches.get_flag("flush-cache"),
            force_handlers: matches.get_flag("force-handlers"),
            list_hosts: matches.get_flag("list-hosts"),
            list_tags: matches.get_flag("list-tags"),
            list_tasks: matches.get_flag("list-tasks"),
            syntax_check: matches.get_flag("syntax-check"),
            forks: matches
                .get_one::<u32>("forks")
                .copied()
                .unwrap_or(ANSIBLE_FORKS_DEFAULT),
            vault_id: string("vault-id"),
            vault_password: string("vault-password"),
            vault_password_file: String::new(),
            verbose: matches.get_one::<u8>("verbose").copied().unwrap_or(0),
            private_key: string("private-key"),
            private_key_file: String::new(),
            user: string("user"),
            connection: string("connection"),
            timeout: matches.get_one::<u32>("timeout").copied().unwrap_or(0),
            ssh_common_args: string("ssh-common-args"),
            sftp_extra_args: string("sftp-extra-args"),
            scp_extra_args: string("scp-extra-args"),
            ssh_extra_args: string("ssh-extra-args"),
            is_become: matches.get_flag("become"),
            become_method: string("become-method"),
            become_user: string("become-user"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::build_cli;

    #[test]
    fn test_default_forks_matches_ansible_default() {
        let settings = Settings::default();
        assert_eq!(settings.forks, ANSIBLE_FORKS_DEFAULT);
        assert!(settings.playbooks.is_empty());
        assert!(!settings.is_become);
    }

    #[test]
    fn test_from_matches_minimal() {
        let matches = build_cli()
            .try_get_matches_from([
                "runsible",
                "--playbook",
                "site.yml",
                "--inventory",
                "inv.yml",
            ])
            .unwrap();
        let settings = Settings::from_matches(&matches);

        assert_eq!(settings.playbooks, vec!["site.yml"]);
        assert_eq!(settings.inventories, vec!["inv.yml"]);
        assert_eq!(settings.forks, ANSIBLE_FORKS_DEFAULT);
        assert_eq!(settings.timeout, 0);
        assert_eq!(settings.verbose, 0);
        assert!(!settings.check);
        assert!(settings.vault_password.is_empty());
    }

    #[test]
    fn test_from_matches_full() {
        let matches = build_cli()
            .try_get_matches_from([
                "runsible",
                "--playbook",
                "site.yml",
                "--playbook",
                "extra.yml",
                "--inventory",
                "inv.yml",
                "--extra-vars",
                "key=value",
                "--module-path",
                "/opt/modules",
                "--check",
                "--become",
                "--become-user",
                "root",
                "--forks",
                "10",
                "--timeout",
                "60",
                "--verbose",
                "3",
            ])
            .unwrap();
        let settings = Settings::from_matches(&matches);

        assert_eq!(settings.playbooks, vec!["site.yml", "extra.yml"]);
        assert_eq!(settings.extra_vars, vec!["key=value"]);
        assert_eq!(settings.module_path, vec!["/opt/modules"]);
        assert!(settings.check);
        assert!(settings.is_become);
        assert_eq!(settings.become_user, "root");
        assert_eq!(settings.forks, 10);
        assert_eq!(settings.timeout, 60);
        assert_eq!(settings.verbose, 3);
    }

    #[test]
    fn test_from_matches_rejects_missing_playbook() {
        // Skip when the plugin environment provides the value.
        if std::env::var_os("PLUGIN_PLAYBOOK").is_some() {
            return;
        }
        let result = build_cli().try_get_matches_from(["runsible", "--inventory", "inv.yml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_matches_splits_comma_separated_values() {
        let matches = build_cli()
            .try_get_matches_from([
                "runsible",
                "--playbook",
                "site.yml,extra.yml",
                "--inventory",
                "staging.yml,production.yml",
            ])
            .unwrap();
        let settings = Settings::from_matches(&matches);

        assert_eq!(settings.playbooks, vec!["site.yml", "extra.yml"]);
        assert_eq!(settings.inventories, vec!["staging.yml", "production.yml"]);
    }
}
