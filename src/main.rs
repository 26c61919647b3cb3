fn main() {
    if let Err(err) = tech_tree_router::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
