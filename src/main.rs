fn main() {
    if let Err(err) = order_pipeline::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
