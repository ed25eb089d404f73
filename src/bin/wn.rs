//! Short binary name (`wn`) that forwards to the `wikinote` library, so no
//! shell alias is needed.

use wikinote::formatting::FormatContext;

fn main() {
    if let Err(err) = wikinote::entry() {
        eprintln!("{}", FormatContext::from_env().error(&err.to_string()));
        std::process::exit(1);
    }
}
