use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub mod identity;
pub mod logging;

pub const ARG_PORT: &str = "port";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("frontdesk")
        .about("Session-gated web front-end")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("FRONTDESK_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long("cookie-secure")
                .help("Mark the session cookie Secure (enable when served over HTTPS)")
                .env("FRONTDESK_COOKIE_SECURE")
                .action(clap::ArgAction::SetTrue),
        );

    let command = identity::with_args(command);

    logging::with_args(command)
}
