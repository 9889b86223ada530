//! Runsible - run Ansible playbooks as a CI pipeline step
//!
//! Translates declarative settings (CLI flags or `PLUGIN_*` environment
//! variables) into argument vectors for the `ansible`, `ansible-galaxy`,
//! `ansible-playbook` and `pip` binaries and executes them in a fixed
//! sequence, relaying the first failing exit status.

pub mod cli;
pub mod commands;
pub mod playbook;
pub mod runner;
pub mod settings;
