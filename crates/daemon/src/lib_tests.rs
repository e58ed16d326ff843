// SPDX-License-Identifier: MIT

use super::*;
use mc_wire::{read_response, write_request, Request};
use tokio::io::BufReader;
use tokio::net::UnixStream;

async fn roundtrip(socket_path: &std::path::Path, request: Request) -> mc_wire::Response {
    let stream = UnixStream::connect(socket_path).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    write_request(&mut write_half, &request).await.unwrap();
    let mut reader = BufReader::new(read_half);
    read_response(&mut reader).await.unwrap()
}

#[tokio::test]
async fn starts_serves_a_request_and_stops_cleanly() {
    let tmp = tempfile::tempdir().unwrap();
    let config = DaemonConfig::for_state_dir(tmp.path());

    let daemon = Daemon::start(config.clone()).await.unwrap();

    // serve() binds the socket inside its spawned task; give it a moment.
    for _ in 0..50 {
        if config.socket_path.exists() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let response = roundtrip(&config.socket_path, Request::new("ping")).await;
    assert!(response.success);

    let add_repo = Request::new("add_repo").with_arg("name", "r").with_arg("github_url", "x").with_arg("tmux_session", "mc-r");
    assert!(roundtrip(&config.socket_path, add_repo).await.success);

    let response = roundtrip(&config.socket_path, Request::new("list_repos")).await;
    let repos: Vec<String> = serde_json::from_value(response.data.unwrap()).unwrap();
    assert_eq!(repos, vec!["r".to_string()]);

    let status = StatusProvider::status(&*daemon, None).await;
    assert_eq!(status.agents.as_array().unwrap().len(), 1);

    daemon.stop().await;
    assert!(!config.socket_path.exists());
}
