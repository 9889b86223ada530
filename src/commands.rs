use std::process::{Command, Stdio};

use crate::settings::{Settings, ANSIBLE_FORKS_DEFAULT};

pub const PIP_BIN: &str = "/usr/local/bin/pip";
pub const ANSIBLE_BIN: &str = "/usr/local/bin/ansible";
pub const ANSIBLE_GALAXY_BIN: &str = "/usr/local/bin/ansible-galaxy";
pub const ANSIBLE_PLAYBOOK_BIN: &str = "/usr/local/bin/ansible-playbook";

/// Description of one external process launch: the program path and its
/// ordered argument vector. Built once, run once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl Invocation {
    fn new(program: &'static str, args: Vec<String>) -> Self {
        Invocation { program, args }
    }

    /// Shell-style trace line, echoed before the command runs.
    pub fn trace_line(&self) -> String {
        format!("+ {} {}", self.program, self.args.join(" "))
    }

    /// Materialize the process command: stdio passed through live,
    /// inherited environment plus forced Ansible color output.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(self.program);
        cmd.args(&self.args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .env("ANSIBLE_FORCE_COLOR", "1");
        cmd
    }
}

fn push_opt(args: &mut Vec<String>, flag: &str, value: &str) {
    if !value.is_empty() {
        args.push(flag.to_string());
        args.push(value.to_string());
    }
}

fn verbosity_flag(verbose: u8) -> String {
    format!("-{}", "v".repeat(verbose as usize))
}

/// Probe the installed Ansible version.
pub fn version() -> Invocation {
    Invocation::new(ANSIBLE_BIN, vec!["--version".to_string()])
}

/// Install python dependencies from the configured requirements file,
/// upgrading packages that are already present.
pub fn pip_install(settings: &Settings) -> Invocation {
    let args = vec![
        "install".to_string(),
        "--upgrade".to_string(),
        "--requirement".to_string(),
        settings.python_requirements.clone(),
    ];

    Invocation::new(PIP_BIN, args)
}

/// Install galaxy roles from the configured role file.
pub fn galaxy_install(settings: &Settings) -> Invocation {
    let mut args = vec![
        "install".to_string(),
        "--force".to_string(),
        "--role-file".to_string(),
        settings.galaxy_requirements.clone(),
    ];

    if settings.verbose > 0 {
        args.push(verbosity_flag(settings.verbose));
    }

    Invocation::new(ANSIBLE_GALAXY_BIN, args)
}

/// Build the ansible-playbook invocation for a single inventory.
///
/// Flag order is fixed. The list-hosts and syntax-check modes return
/// early: nothing configured after them is appended. The verbosity flag
/// always comes last, just before the playbook paths.
pub fn playbook_run(settings: &Settings, inventory: &str) -> Invocation {
    let mut args = vec!["--inventory".to_string(), inventory.to_string()];

    if !settings.module_path.is_empty() {
        push_opt(&mut args, "--module-path", &settings.module_path.join(":"));
    }

    push_opt(&mut args, "--vault-id", &settings.vault_id);
    push_opt(&mut args, "--vault-password-file", &settings.vault_password_file);

    for var in &settings.extra_vars {
        push_opt(&mut args, "--extra-vars", var);
    }

    if settings.list_hosts {
        args.push("--list-hosts".to_string());
        args.extend(settings.playbooks.iter().cloned());

        return Invocation::new(ANSIBLE_PLAYBOOK_BIN, args);
    }

    if settings.syntax_check {
        args.push("--syntax-check".to_string());
        args.extend(settings.playbooks.iter().cloned());

        return Invocation::new(ANSIBLE_PLAYBOOK_BIN, args);
    }

    if settings.check {
        args.push("--check".to_string());
    }

    if settings.diff {
        args.push("--diff".to_string());
    }

    if settings.flush_cache {
        args.push("--flush-cache".to_string());
    }

    if settings.force_handlers {
        args.push("--force-handlers".to_string());
    }

    if settings.forks != ANSIBLE_FORKS_DEFAULT {
        push_opt(&mut args, "--forks", &settings.forks.to_string());
    }

    push_opt(&mut args, "--limit", &settings.limit);

    if settings.list_tags {
        args.push("--list-tags".to_string());
    }

    if settings.list_tasks {
        args.push("--list-tasks".to_string());
    }

    push_opt(&mut args, "--skip-tags", &settings.skip_tags);
    push_opt(&mut args, "--start-at-task", &settings.start_at_task);
    push_opt(&mut args, "--tags", &settings.tags);
    push_opt(&mut args, "--private-key", &settings.private_key_file);
    push_opt(&mut args, "--user", &settings.user);
    push_opt(&mut args, "--connection", &settings.connection);

    if settings.timeout != 0 {
        push_opt(&mut args, "--timeout", &settings.timeout.to_string());
    }

    push_opt(&mut args, "--ssh-common-args", &settings.ssh_common_args);
    push_opt(&mut args, "--sftp-extra-args", &settings.sftp_extra_args);
    push_opt(&mut args, "--scp-extra-args", &settings.scp_extra_args);
    push_opt(&mut args, "--ssh-extra-args", &settings.ssh_extra_args);

    if settings.is_become {
        args.push("--become".to_string());
    }

    push_opt(&mut args, "--become-method", &settings.become_method);
    push_opt(&mut args, "--become-user", &settings.become_user);

    if settings.verbose > 0 {
        args.push(verbosity_flag(settings.verbose));
    }

    args.extend(settings.playbooks.iter().cloned());

    Invocation::new(ANSIBLE_PLAYBOOK_BIN, args)
}
