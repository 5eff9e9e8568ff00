use sankey_svg::Error;

fn main() {
    if let Err(err) = sankey_svg::run() {
        eprintln!("error: {err}");
        let code = err.downcast_ref::<Error>().map_or(1, Error::exit_code);
        std::process::exit(code);
    }
}
