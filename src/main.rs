use wikinote::formatting::FormatContext;

fn main() {
    if let Err(err) = wikinote::entry() {
        eprintln!("{}", FormatContext::from_env().error(&err.to_string()));
        std::process::exit(1);
    }
}
