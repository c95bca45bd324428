use player::Collector;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();
    let code = player::launch(std::env::args_os(), &Collector).await;
    process::exit(code);
}
