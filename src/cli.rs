use clap::{Arg, ArgAction, Command};

/// Pick the environment variable to bind for an option that historically
/// accepted more than one name. clap binds a single variable per argument,
/// so the alias is only consulted when the primary is unset.
fn env_or(primary: &'static str, alias: &'static str) -> &'static str {
    if std::env::var_os(primary).is_none() && std::env::var_os(alias).is_some() {
        alias
    } else {
        primary
    }
}

pub fn build_cli() -> Command {
    Command::new("runsible")
        .about("Run Ansible playbooks as a CI pipeline step")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("python-requirements")
                .long("python-requirements")
                .help("Path to python requirements file")
                .env("PLUGIN_PYTHON_REQUIREMENTS")
                .value_name("PATH"),
        )
        .arg(
            Arg::new("galaxy-requirements")
                .long("galaxy-requirements")
                .help("Path to galaxy requirements file")
                .env("PLUGIN_GALAXY_REQUIREMENTS")
                .value_name("PATH"),
        )
        .arg(
            Arg::new("inventory")
                .short('i')
                .long("inventory")
                .help("Path to inventory file")
                .env(env_or("PLUGIN_INVENTORY", "PLUGIN_INVENTORIES"))
                .required(true)
                .action(ArgAction::Append)
                .value_delimiter(',')
                .value_name("INVENTORY"),
        )
        .arg(
            Arg::new("playbook")
                .short('p')
                .long("playbook")
                .help("List of playbooks to apply")
                .env(env_or("PLUGIN_PLAYBOOK", "PLUGIN_PLAYBOOKS"))
                .required(true)
                .action(ArgAction::Append)
                .value_delimiter(',')
                .value_name("PLAYBOOK"),
        )
        .arg(
            Arg::new("limit")
                .short('l')
                .long("limit")
                .help("Limit selected hosts to an additional pattern")
                .env("PLUGIN_LIMIT")
                .value_name("SUBSET"),
        )
        .arg(
            Arg::new("skip-tags")
                .long("skip-tags")
                .help("Only run plays and tasks whose tags do not match")
                .env("PLUGIN_SKIP_TAGS")
                .value_name("TAGS"),
        )
        .arg(
            Arg::new("start-at-task")
                .long("start-at-task")
                .help("Start the playbook at the task matching this name")
                .env("PLUGIN_START_AT_TASK")
                .value_name("TASK"),
        )
        .arg(
            Arg::new("tags")
                .short('t')
                .long("tags")
                .help("Only run plays and tasks tagged with these values")
                .env("PLUGIN_TAGS")
                .value_name("TAGS"),
        )
        .arg(
            Arg::new("extra-vars")
                .short('e')
                .long("extra-vars")
                .help("Set additional variables as key=value")
                .env(env_or("PLUGIN_EXTRA_VARS", "ANSIBLE_EXTRA_VARS"))
                .action(ArgAction::Append)
                .value_delimiter(',')
                .value_name("KEY=VALUE"),
        )
        .arg(
            Arg::new("module-path")
                .long("module-path")
                .help("Prepend paths to module library")
                .env("PLUGIN_MODULE_PATH")
                .action(ArgAction::Append)
                .value_delimiter(',')
                .value_name("PATH"),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Run a check, do not apply any changes")
                .env("PLUGIN_CHECK")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("diff")
                .long("diff")
                .help("Show the differences, may print secrets")
                .env("PLUGIN_DIFF")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("flush-cache")
                .long("flush-cache")
                .help("Clear the fact cache for every host in inventory")
                .env("PLUGIN_FLUSH_CACHE")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("force-handlers")
                .long("force-handlers")
                .help("Run handlers even if a task fails")
                .env("PLUGIN_FORCE_HANDLERS")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-hosts")
                .long("list-hosts")
                .help("Output a list of matching hosts")
                .env("PLUGIN_LIST_HOSTS")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-tags")
                .long("list-tags")
                .help("List all available tags")
                .env("PLUGIN_LIST_TAGS")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-tasks")
                .long("list-tasks")
                .help("List all tasks that would be executed")
                .env("PLUGIN_LIST_TASKS")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("syntax-check")
                .long("syntax-check")
                .help("Perform a syntax check on the playbook")
                .env("PLUGIN_SYNTAX_CHECK")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("forks")
                .long("forks")
                .help("Specify number of parallel processes to use")
                .env("PLUGIN_FORKS")
                .value_parser(clap::value_parser!(u32))
                .default_value("5")
                .value_name("N"),
        )
        .arg(
            Arg::new("vault-id")
                .long("vault-id")
                .help("The vault identity to use")
                .env(env_or("PLUGIN_VAULT_ID", "ANSIBLE_VAULT_ID"))
                .value_name("ID"),
        )
        .arg(
            Arg::new("vault-password")
                .long("vault-password")
                .help("The vault password to use")
                .env(env_or("PLUGIN_VAULT_PASSWORD", "ANSIBLE_VAULT_PASSWORD"))
                .value_name("PASSWORD"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Level of verbosity, 0 up to 4")
                .env("PLUGIN_VERBOSE")
                .value_parser(clap::value_parser!(u8).range(0..=4))
                .default_value("0")
                .value_name("LEVEL"),
        )
        .arg(
            Arg::new("private-key")
                .long("private-key")
                .help("SSH private key used to authenticate the connection")
                .env(env_or("PLUGIN_PRIVATE_KEY", "ANSIBLE_PRIVATE_KEY"))
                .value_name("KEY"),
        )
        .arg(
            Arg::new("user")
                .short('u')
                .long("user")
                .help("Connect as this user")
                .env(env_or("PLUGIN_USER", "ANSIBLE_USER"))
                .value_name("USER"),
        )
        .arg(
            Arg::new("connection")
                .short('c')
                .long("connection")
                .help("Connection type to use")
                .env("PLUGIN_CONNECTION")
                .value_name("TYPE"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Override the connection timeout in seconds")
                .env("PLUGIN_TIMEOUT")
                .value_parser(clap::value_parser!(u32))
                .default_value("0")
                .value_name("SECONDS"),
        )
        .arg(
            Arg::new("ssh-common-args")
                .long("ssh-common-args")
                .help("Specify common arguments to pass to SFTP, SCP and SSH connections")
                .env("PLUGIN_SSH_COMMON_ARGS")
                .value_name("ARGS"),
        )
        .arg(
            Arg::new("sftp-extra-args")
                .long("sftp-extra-args")
                .help("Specify extra arguments to pass to SFTP connections only")
                .env("PLUGIN_SFTP_EXTRA_ARGS")
                .value_name("ARGS"),
        )
        .arg(
            Arg::new("scp-extra-args")
                .long("scp-extra-args")
                .help("Specify extra arguments to pass to SCP connections only")
                .env("PLUGIN_SCP_EXTRA_ARGS")
                .value_name("ARGS"),
        )
        .arg(
            Arg::new("ssh-extra-args")
                .long("ssh-extra-args")
                .help("Specify extra arguments to pass to SSH connections only")
                .env("PLUGIN_SSH_EXTRA_ARGS")
                .value_name("ARGS"),
        )
        .arg(
            Arg::new("become")
                .short('b')
                .long("become")
                .help("Enable privilege escalation")
                .env("PLUGIN_BECOME")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("become-method")
                .long("become-method")
                .help("Privilege escalation method to use")
                .env(env_or("PLUGIN_BECOME_METHOD", "ANSIBLE_BECOME_METHOD"))
                .value_name("METHOD"),
        )
        .arg(
            Arg::new("become-user")
                .long("become-user")
                .help("Privilege escalation user to use")
                .env(env_or("PLUGIN_BECOME_USER", "ANSIBLE_BECOME_USER"))
                .value_name("USER"),
        )
}
