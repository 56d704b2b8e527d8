//! Request handling subcommands. Each one builds an [`App`] from the
//! configuration, answers a single request and writes the result to stdout.

use crate::app::App;
use crate::config::Config;
use anyhow::Context;
use clap::{ArgMatches, Command};
use dashboard::{ChartPayload, ViewId};

fn view_arg(name: &'static str) -> clap::Arg {
    clap::Arg::new(name).value_parser(ViewId::ALL.map(|id| id.as_str()))
}

pub fn users() -> Command {
    Command::new("users")
        .about("List users, optionally only those with data for one or two views")
        .arg(
            view_arg("VIEW")
                .long("view")
                .help("Only users with records for this view"),
        )
        .arg(
            view_arg("WITH")
                .long("with")
                .requires("VIEW")
                .help("Only users that also have records for this view"),
        )
}

pub fn plot() -> Command {
    Command::new("plot")
        .about("Chart one view of one user")
        .arg(
            clap::Arg::new("USER")
                .long("user")
                .short('u')
                .help("Full user id (defaults to the configured user)"),
        )
        .arg(
            view_arg("VIEW")
                .long("view")
                .help("View to plot (defaults to the configured view)"),
        )
}

pub fn pair() -> Command {
    Command::new("pair")
        .about("Chart two views of one user stacked on a shared time axis")
        .arg(
            clap::Arg::new("USER")
                .long("user")
                .short('u')
                .help("Full user id (defaults to the configured user)"),
        )
        .arg(view_arg("VIEW1").required(true).index(1).help("Top row view"))
        .arg(view_arg("VIEW2").required(true).index(2).help("Bottom row view"))
}

pub fn compare() -> Command {
    Command::new("compare")
        .about("Chart one view of two users stacked on a shared time axis")
        .arg(clap::Arg::new("USER1").required(true).index(1).help("First user id"))
        .arg(clap::Arg::new("USER2").required(true).index(2).help("Second user id"))
        .arg(
            view_arg("VIEW")
                .long("view")
                .help("View to compare (defaults to the configured view)"),
        )
}

pub fn summary() -> Command {
    Command::new("summary").about("Print record counts per user and view")
}

pub fn run_users(config: &Config, args: &ArgMatches) -> anyhow::Result<()> {
    let app = App::from_config(config)?;
    let metadata = app.metadata();

    let users = match args.get_one::<String>("VIEW") {
        Some(view) => metadata.list_users_with_data(
            view,
            args.get_one::<String>("WITH").map(|v| v.as_str()),
        )?,
        None => metadata.list_users(),
    };

    for (full, slug) in users {
        println!("{full}\t{slug}");
    }

    Ok(())
}

pub fn run_plot(config: &Config, args: &ArgMatches) -> anyhow::Result<()> {
    let app = App::from_config(config)?;
    let user = user_or_default(config, args, "USER");
    let view = view_or_default(config, args, "VIEW")?;

    print(&app.plot_user(user, &view)?)
}

pub fn run_pair(config: &Config, args: &ArgMatches) -> anyhow::Result<()> {
    let app = App::from_config(config)?;
    let user = user_or_default(config, args, "USER");
    let view1 = required(args, "VIEW1")?;
    let view2 = required(args, "VIEW2")?;

    print(&app.plot_pair(user, view1, view2)?)
}

pub fn run_compare(config: &Config, args: &ArgMatches) -> anyhow::Result<()> {
    let app = App::from_config(config)?;
    let user1 = required(args, "USER1")?;
    let user2 = required(args, "USER2")?;
    let view = view_or_default(config, args, "VIEW")?;

    print(&app.plot_comparison(user1, user2, &view)?)
}

pub fn run_summary(config: &Config) -> anyhow::Result<()> {
    let app = App::from_config(config)?;
    print!("{}", app.metadata().summary());
    Ok(())
}

fn print(payload: &ChartPayload) -> anyhow::Result<()> {
    println!("{}", payload.to_json().context("failed to serialize chart")?);
    Ok(())
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    args.get_one::<String>(name)
        .map(|v| v.as_str())
        .with_context(|| format!("missing argument {name}"))
}

fn user_or_default<'a>(config: &'a Config, args: &'a ArgMatches, name: &str) -> &'a str {
    args.get_one::<String>(name)
        .map(|v| v.as_str())
        .unwrap_or_else(|| config.general().default_user())
}

fn view_or_default(config: &Config, args: &ArgMatches, name: &str) -> anyhow::Result<String> {
    match args.get_one::<String>(name) {
        Some(view) => Ok(view.clone()),
        None => Ok(config.general().default_view()?.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_arguments_only_accept_known_views() {
        assert!(plot()
            .try_get_matches_from(["plot", "--view", "heart_rate"])
            .is_ok());
        assert!(plot()
            .try_get_matches_from(["plot", "--view", "steps"])
            .is_err());
        assert!(pair()
            .try_get_matches_from(["pair", "sleep", "blood_oxygenation"])
            .is_ok());
    }

    #[test]
    fn with_requires_view() {
        assert!(users().try_get_matches_from(["users", "--with", "sleep"]).is_err());

        let args = users()
            .try_get_matches_from(["users", "--view", "sleep", "--with", "heart_rate"])
            .unwrap();
        assert_eq!(args.get_one::<String>("WITH").unwrap(), "heart_rate");
    }

    #[test]
    fn defaults_come_from_config() {
        let config = Config::default();
        let args = plot().try_get_matches_from(["plot"]).unwrap();

        assert_eq!(user_or_default(&config, &args, "USER"), "demo-user-1");
        assert_eq!(view_or_default(&config, &args, "VIEW").unwrap(), "sleep");
    }
}
