//! Git identity switcher with a shell prompt renderer.
//!
//! Identities live in `~/.config/gitusers.json`. Without arguments the
//! registered identities are listed; `-p` prints the prompt string
//! (identity, branch, ahead/behind, change counts) for the current directory.

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser};

use gitusers::core::render::render_identity;
use gitusers::core::resolver::resolve;
use gitusers::core::types::ResolutionStatus;
use gitusers::exit_codes;
use gitusers::identity::{clone_with_identity, format_identity_list, switch_identity};
use gitusers::io::editor::{choose_editor, open_in_editor};
use gitusers::io::git::Git;
use gitusers::io::process::SystemRunner;
use gitusers::logging;
use gitusers::prompt::build_prompt;
use gitusers::session::{Session, SessionPaths};

#[derive(Parser, Debug)]
#[command(
    name = "gitusers",
    version,
    about = "Switch between git identities and render repository status for shell prompts",
    after_help = "Examples:\n  gitusers work                       switch this repository to `work`\n  gitusers work clone git@host:r.git  clone with work's ssh key",
    group(ArgGroup::new("action").multiple(false))
)]
struct Cli {
    /// Print the identity active in this repository.
    #[arg(short = 'c', long = "check", group = "action")]
    check: bool,

    /// Print the short name of the active identity, or exit with code 2.
    #[arg(short = 'g', long = "get", group = "action")]
    get: bool,

    /// List registered identities.
    #[arg(short = 'l', long = "list", group = "action")]
    list: bool,

    /// Open the identity registry in an editor.
    #[arg(short = 'e', long = "edit", group = "action")]
    edit: bool,

    /// Print the full prompt string.
    #[arg(short = 'p', long = "prompt", group = "action")]
    prompt: bool,

    /// `<identity>` to switch, or `<identity> clone <url> [git clone args...]`.
    #[arg(trailing_var_arg = true, conflicts_with = "action")]
    args: Vec<String>,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let session = Session::load(&SessionPaths::from_env()?)?;

    if cli.list {
        return cmd_list(&session);
    }
    if cli.check {
        return cmd_check(&session);
    }
    if cli.get {
        return cmd_get(&session);
    }
    if cli.edit {
        return cmd_edit(&session);
    }
    if cli.prompt {
        return cmd_prompt(&session);
    }
    match cli.args.as_slice() {
        [] => cmd_list(&session),
        [token] => cmd_switch(&session, token),
        [token, verb, rest @ ..] if verb == "clone" && !rest.is_empty() => {
            cmd_clone(&session, token, rest)
        }
        other => bail!("unsupported arguments: {}", other.join(" ")),
    }
}

fn cmd_check(session: &Session) -> Result<i32> {
    let status = session.resolution()?;
    if let Some(marker) = render_identity(&status, &session.settings.prompt) {
        print!("{marker}");
    }
    Ok(exit_codes::OK)
}

fn cmd_get(session: &Session) -> Result<i32> {
    match session.resolution()? {
        ResolutionStatus::Found(short) => {
            println!("{short}");
            Ok(exit_codes::OK)
        }
        ResolutionStatus::Empty => {
            eprintln!("no identity configured");
            Ok(exit_codes::NO_IDENTITY)
        }
        ResolutionStatus::Unknown(name) => {
            eprintln!("unregistered identity: {name}");
            Ok(exit_codes::NO_IDENTITY)
        }
        ResolutionStatus::NoRepository => {
            eprintln!("not inside a git repository");
            Ok(exit_codes::NO_IDENTITY)
        }
    }
}

fn cmd_list(session: &Session) -> Result<i32> {
    let registry = session.registry()?;
    let status = resolve(
        session.repository.is_some(),
        session.active.as_ref(),
        &registry.identities,
    );
    let active = match &status {
        ResolutionStatus::Found(short) => Some(short.as_str()),
        _ => None,
    };
    print!("{}", format_identity_list(&registry.identities, active));
    Ok(exit_codes::OK)
}

fn cmd_edit(session: &Session) -> Result<i32> {
    let visual = std::env::var("VISUAL").ok();
    let editor = std::env::var("EDITOR").ok();
    let chosen = choose_editor(
        session.settings.editor.as_deref(),
        visual.as_deref(),
        editor.as_deref(),
    );
    if let Some(parent) = session.registry_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    open_in_editor(&chosen, &session.registry_path)?;
    Ok(exit_codes::OK)
}

fn cmd_prompt(session: &Session) -> Result<i32> {
    let status = session.resolution()?;
    let git = Git::new(SystemRunner::new(&session.cwd));
    let today = chrono::Local::now().date_naive();
    if let Some(prompt) = build_prompt(&status, &git, &session.settings, today)? {
        print!("{prompt}");
    }
    Ok(exit_codes::OK)
}

fn cmd_switch(session: &Session, token: &str) -> Result<i32> {
    let repo = session.require_repository()?;
    let registry = session.registry()?;
    let Some(identity) = registry.lookup(token) else {
        bail!(
            "could not find a defined user matching {token}, defined users: {}",
            registry.short_names()
        );
    };
    let git = Git::new(SystemRunner::new(&repo.root));
    switch_identity(&git, identity)?;
    Ok(exit_codes::OK)
}

fn cmd_clone(session: &Session, token: &str, args: &[String]) -> Result<i32> {
    let registry = session.registry()?;
    let Some(identity) = registry.lookup(token) else {
        bail!(
            "could not find a defined user matching {token}, defined users: {}",
            registry.short_names()
        );
    };
    let git = Git::new(SystemRunner::new(&session.cwd));
    let dest = clone_with_identity(&git, identity, args, &session.cwd)?;
    if let Some(dest) = dest.filter(|dest| dest.join(".git").exists()) {
        switch_identity(&Git::new(SystemRunner::new(&dest)), identity)?;
    }
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_no_args_lists() {
        let cli = Cli::parse_from(["gitusers"]);
        assert!(!cli.check && !cli.prompt);
        assert!(cli.args.is_empty());
    }

    #[test]
    fn parse_prompt_flag() {
        let cli = Cli::parse_from(["gitusers", "-p"]);
        assert!(cli.prompt);
    }

    #[test]
    fn parse_switch_token() {
        let cli = Cli::parse_from(["gitusers", "work"]);
        assert_eq!(cli.args, vec!["work"]);
    }

    #[test]
    fn parse_clone_keeps_trailing_git_options() {
        let cli = Cli::parse_from(["gitusers", "work", "clone", "git@h:r.git", "--depth", "1"]);
        assert_eq!(cli.args, vec!["work", "clone", "git@h:r.git", "--depth", "1"]);
    }

    #[test]
    fn flags_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["gitusers", "-c", "-p"]).is_err());
        assert!(Cli::try_parse_from(["gitusers", "-l", "work"]).is_err());
    }
}
