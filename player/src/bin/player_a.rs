use player::Spender;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();
    let code = player::launch(std::env::args_os(), &Spender).await;
    process::exit(code);
}
