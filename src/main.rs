mod binutils;
mod cmds;
mod logfile;

#[tokio::main]
async fn main() {
    cmds::cmd_loader().await;
}
