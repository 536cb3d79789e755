use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let tokens: Vec<String> = std::env::args().skip(1).collect();

    if tokens.iter().any(|token| token == "--help") {
        print!("{}", rls::cli::USAGE);
        return ExitCode::SUCCESS;
    }
    if tokens.iter().any(|token| token == "--version") {
        println!("rls {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let mut stdout = std::io::stdout().lock();
    match rls::run(&tokens, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("rls: {err:#}");
            ExitCode::from(1)
        }
    }
}
