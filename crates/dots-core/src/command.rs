//! Wire command table and line classification.
//!
//! Every line the operator types goes through [`classify`] before anything
//! touches the network. Matching is ASCII case-insensitive throughout and
//! compares the whole line, except for the `#KICK` family which matches by
//! prefix. Lines are not trimmed.

/// Marker that opens every directive.
pub const DIRECTIVE_MARKER: char = '#';

/// Prefix on text produced by the client itself rather than the server.
pub const LOCAL_ECHO: &str = "#CL";

/// Directive sent once, with the login id as argument, right after connecting.
pub const LOGIN: &str = "#Login";
pub const LOGOFF: &str = "#Logoff";
pub const QUIT: &str = "#Quit";
pub const GET_HOST: &str = "#GetHost";
pub const GET_PORT: &str = "#GetPort";
pub const KICK_PREFIX: &str = "#KICK";
/// Host-only; carries no marker on the wire.
pub const START_LISTENING: &str = "StartListening";
/// Host-only; carries no marker on the wire.
pub const STOP_LISTENING: &str = "StopListening";

/// Payload a non-host `#Quit` sends before tearing down.
pub const QUIT_LOGOFF_PAYLOAD: &str = "#logoff";

pub const INVALID_MESSAGE: &str = "#CLThat is not a valid message.";

/// Build the login line for `login_id`.
pub fn login_line(login_id: &str) -> String {
    format!("{LOGIN} {login_id}")
}

/// Prefix `text` with the local echo marker.
pub fn local_echo(text: &str) -> String {
    format!("{LOCAL_ECHO}{text}")
}

/// What the client should do with one line of operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Not a directive. Shown back as invalid, never sent.
    Invalid,
    /// Host-privileged directive, forwarded unchanged with no local effect.
    HostPassthrough(&'a str),
    /// `#Logoff`: forward, then tear down the session.
    Logoff(&'a str),
    /// `#GetHost`: answered locally.
    GetHost,
    /// `#GetPort`: answered locally.
    GetPort,
    /// `#Quit` from a guest: send [`QUIT_LOGOFF_PAYLOAD`], then tear down.
    Quit,
    /// Any other directive; the server decides what it means.
    Forward(&'a str),
}

/// Classify `line`. `is_host` must be read fresh for every line since host
/// status can change while connected.
///
/// `StartListening` and `StopListening` only match without the marker, so
/// the entry gate already rejects them; typed with the marker they fall
/// through to [`Command::Forward`] and reach the server unchanged anyway.
pub fn classify(line: &str, is_host: bool) -> Command<'_> {
    if !line.starts_with(DIRECTIVE_MARKER) {
        return Command::Invalid;
    }

    if is_host
        && (line.eq_ignore_ascii_case(QUIT)
            || line.eq_ignore_ascii_case(START_LISTENING)
            || line.eq_ignore_ascii_case(STOP_LISTENING)
            || starts_with_ignore_case(line, KICK_PREFIX))
    {
        return Command::HostPassthrough(line);
    }

    if line.eq_ignore_ascii_case(LOGOFF) {
        Command::Logoff(line)
    } else if line.eq_ignore_ascii_case(GET_HOST) {
        Command::GetHost
    } else if line.eq_ignore_ascii_case(GET_PORT) {
        Command::GetPort
    } else if line.eq_ignore_ascii_case(QUIT) {
        Command::Quit
    } else {
        Command::Forward(line)
    }
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
