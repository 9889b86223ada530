use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};
use colored::Colorize;
use log::{debug, info};
use std::io::Write;
use tempfile::NamedTempFile;

use crate::commands::{self, Invocation};
use crate::playbook;
use crate::settings::Settings;

const ANSIBLE_DIR: &str = "/etc/ansible";
const ANSIBLE_CONFIG_FILE: &str = "ansible.cfg";

/// Host key checking is disabled: CI runners talk to freshly provisioned
/// machines whose keys are not in any known_hosts file.
const ANSIBLE_CONFIG_CONTENT: &str = "\n[defaults]\nhost_key_checking = False\n";

#[cfg(unix)]
const SECRET_FILE_MODE: u32 = 0o600;

/// Run the whole pipeline step: resolve playbooks, write the Ansible
/// configuration, stage secret material, then execute the external
/// commands in order, stopping at the first failure.
///
/// Staged secret files are owned by RAII guards held for the duration of
/// this function, so they are removed on every exit path; removal is
/// best-effort and never masks the primary error.
pub fn run(settings: &mut Settings) -> Result<()> {
    settings.playbooks = playbook::resolve(&settings.playbooks)?;
    debug!("resolved playbooks: {:?}", settings.playbooks);

    write_ansible_config(Path::new(ANSIBLE_DIR))?;

    let _private_key = if !settings.private_key.is_empty() {
        let file = stage_secret("privateKey", &settings.private_key)?;
        settings.private_key_file = file.path().to_string_lossy().into_owned();
        Some(file)
    } else {
        None
    };

    let _vault_password = if !settings.vault_password.is_empty() {
        let file = stage_secret("vaultPass", &settings.vault_password)?;
        settings.vault_password_file = file.path().to_string_lossy().into_owned();
        Some(file)
    } else {
        None
    };

    execute(&build_invocations(settings))
}

/// Assemble the full command sequence: version probe, optional dependency
/// installs, then one playbook run per configured inventory.
pub fn build_invocations(settings: &Settings) -> Vec<Invocation> {
    let mut invocations = vec![commands::version()];

    if !settings.python_requirements.is_empty() {
        invocations.push(commands::pip_install(settings));
    }

    if !settings.galaxy_requirements.is_empty() {
        invocations.push(commands::galaxy_install(settings));
    }

    for inventory in &settings.inventories {
        invocations.push(commands::playbook_run(settings, inventory));
    }

    invocations
}

/// Run the invocations strictly in order, echoing a shell-style trace
/// line before each one. The first spawn error or non-zero exit halts
/// the sequence.
fn execute(invocations: &[Invocation]) -> Result<()> {
    info!("executing {} commands", invocations.len());

    for invocation in invocations {
        println!("{}", invocation.trace_line().bold());

        let status = invocation
            .command()
            .status()
            .map_err(|e| anyhow!("Failed to run {}: {}", invocation.program, e))?;

        if !status.success() {
            return Err(anyhow!("{} failed: {}", invocation.program, status));
        }
    }

    Ok(())
}

/// Write the Ansible configuration file below the given directory,
/// creating the directory first. Must happen before any playbook command
/// is spawned.
pub fn write_ansible_config(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .map_err(|e| anyhow!("Failed to create ansible directory: {}", e))?;

    let path = dir.join(ANSIBLE_CONFIG_FILE);
    fs::write(&path, ANSIBLE_CONFIG_CONTENT)
        .map_err(|e| anyhow!("Failed to create ansible config: {}", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(SECRET_FILE_MODE))
            .map_err(|e| anyhow!("Failed to set ansible config permissions: {}", e))?;
    }

    Ok(())
}

/// Materialize secret material into a uniquely named temporary file with
/// owner-only permissions. The returned guard deletes the file on drop.
fn stage_secret(prefix: &str, content: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .tempfile()
        .map_err(|e| anyhow!("Failed to create {} file: {}", prefix, e))?;

    file.write_all(content.as_bytes())
        .map_err(|e| anyhow!("Failed to write {} file: {}", prefix, e))?;
    file.flush()
        .map_err(|e| anyhow!("Failed to write {} file: {}", prefix, e))?;

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_write_ansible_config() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("etc").join("ansible");

        write_ansible_config(&target).unwrap();

        let content = fs::read_to_string(target.join(ANSIBLE_CONFIG_FILE)).unwrap();
        assert_eq!(content, ANSIBLE_CONFIG_CONTENT);
        assert!(content.contains("host_key_checking = False"));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_ansible_config_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        write_ansible_config(dir.path()).unwrap();

        let meta = fs::metadata(dir.path().join(ANSIBLE_CONFIG_FILE)).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, SECRET_FILE_MODE);
    }

    #[test]
    fn test_stage_secret_content_and_prefix() {
        let file = stage_secret("privateKey", "KEY MATERIAL").unwrap();

        let name = file.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("privateKey"));
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "KEY MATERIAL");
    }

    #[cfg(unix)]
    #[test]
    fn test_stage_secret_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let file = stage_secret("vaultPass", "s3cret").unwrap();
        let meta = fs::metadata(file.path()).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, SECRET_FILE_MODE);
    }

    #[test]
    fn test_stage_secret_removed_on_drop() {
        let path: PathBuf;
        {
            let file = stage_secret("vaultPass", "s3cret").unwrap();
            path = file.path().to_path_buf();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_build_invocations_minimal_sequence() {
        let settings = Settings {
            inventories: vec!["inv.yml".to_string()],
            playbooks: vec!["site.yml".to_string()],
            ..Settings::default()
        };

        let invocations = build_invocations(&settings);
        assert_eq!(invocations.len(), 2);
        assert_eq!(invocations[0], commands::version());
        assert_eq!(invocations[1].program, commands::ANSIBLE_PLAYBOOK_BIN);
    }

    #[test]
    fn test_build_invocations_full_sequence() {
        let settings = Settings {
            inventories: vec!["staging.yml".to_string(), "production.yml".to_string()],
            playbooks: vec!["site.yml".to_string()],
            python_requirements: "requirements.txt".to_string(),
            galaxy_requirements: "galaxy.yml".to_string(),
            ..Settings::default()
        };

        let invocations = build_invocations(&settings);
        let programs: Vec<_> = invocations.iter().map(|i| i.program).collect();
        assert_eq!(
            programs,
            vec![
                commands::ANSIBLE_BIN,
                commands::PIP_BIN,
                commands::ANSIBLE_GALAXY_BIN,
                commands::ANSIBLE_PLAYBOOK_BIN,
                commands::ANSIBLE_PLAYBOOK_BIN,
            ]
        );

        // One run per inventory, in configured order.
        assert_eq!(invocations[3].args[1], "staging.yml");
        assert_eq!(invocations[4].args[1], "production.yml");
    }

    #[test]
    fn test_execute_stops_at_first_failure() {
        let invocations = vec![
            Invocation {
                program: "/bin/sh",
                args: vec!["-c".to_string(), "exit 3".to_string()],
            },
            Invocation {
                program: "/bin/sh",
                args: vec!["-c".to_string(), "exit 0".to_string()],
            },
        ];

        let err = execute(&invocations).unwrap_err();
        assert!(err.to_string().contains("/bin/sh failed"), "{}", err);
    }

    #[test]
    fn test_execute_reports_spawn_errors() {
        let invocations = vec![Invocation {
            program: "/nonexistent/binary",
            args: vec![],
        }];

        let err = execute(&invocations).unwrap_err();
        assert!(err.to_string().contains("Failed to run"), "{}", err);
    }

    #[test]
    fn test_execute_succeeds_when_all_commands_succeed() {
        let invocations = vec![Invocation {
            program: "/bin/sh",
            args: vec!["-c".to_string(), "exit 0".to_string()],
        }];

        assert!(execute(&invocations).is_ok());
    }
}
