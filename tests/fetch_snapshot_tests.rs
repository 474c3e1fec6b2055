use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;
use tokio::task;
use warp::Filter;
use warp::http::StatusCode;

const TOKEN_ENV: &str = "SITECAST_FETCH_TEST_TOKEN";

fn snapshot_server() -> std::net::SocketAddr {
    let snapshot = serde_json::json!({
        "project_name": "harbour-bridge",
        "planned_end_date": "2026-12-31",
        "current_progress": 45.0,
        "planned_progress": 50.0,
        "elapsed_days": 200,
        "project_duration_days": 400,
        "budget": 1000000.0,
        "actual_cost": 500000.0
    });

    let route = warp::path!("projects" / String / "snapshot")
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .map(move |project: String, authorization: Option<String>| {
            if authorization.as_deref() != Some("Bearer mocktoken") {
                return warp::reply::with_status(
                    warp::reply::json(&serde_json::json!({})),
                    StatusCode::UNAUTHORIZED,
                );
            }
            if project != "harbour-bridge" {
                return warp::reply::with_status(
                    warp::reply::json(&serde_json::json!({})),
                    StatusCode::NOT_FOUND,
                );
            }
            warp::reply::with_status(warp::reply::json(&snapshot), StatusCode::OK)
        });
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn live_config(socket_addr: std::net::SocketAddr) -> assert_fs::NamedTempFile {
    let config_yaml = format!(
        r#"
source:
  mode: live
  base_url: http://{socket_addr}
  api_token_env: {TOKEN_ENV}
  timeout_secs: 5
"#
    );
    let config_file = assert_fs::NamedTempFile::new("sitecast_live_config.yaml").unwrap();
    config_file.write_str(&config_yaml).unwrap();
    config_file
}

#[tokio::test()]
async fn fetch_snapshot_from_live_source() {
    let addr = snapshot_server();
    let config_file = live_config(addr);
    let output_file = assert_fs::NamedTempFile::new("live_snapshot.yaml").unwrap();

    let config_arg = config_file.path().to_str().unwrap().to_string();
    let output_arg = output_file.path().to_str().unwrap().to_string();
    task::spawn_blocking(move || {
        let mut cmd = assert_cmd::cargo_bin_cmd!("sitecast");
        cmd.env(TOKEN_ENV, "mocktoken");
        cmd.args([
            "fetch-snapshot",
            "-p",
            "harbour-bridge",
            "-c",
            &config_arg,
            "-o",
            &output_arg,
        ]);

        cmd.assert()
            .success()
            .stdout(predicate::str::contains("Snapshot for harbour-bridge written to"))
            .stdout(predicate::str::contains("(live source)"));
    })
    .await
    .unwrap();

    let output = fs::read_to_string(output_file.path()).unwrap();
    assert!(output.contains("project_name: harbour-bridge"));
    assert!(output.contains("planned_end_date: 2026-12-31"));
    assert!(output.contains("elapsed_days: 200"));
    assert!(output.contains("actual_cost: 500000.0"));
}

#[tokio::test()]
async fn unknown_project_is_reported() {
    let addr = snapshot_server();
    let config_file = live_config(addr);
    let output_file = assert_fs::NamedTempFile::new("missing_snapshot.yaml").unwrap();

    let config_arg = config_file.path().to_str().unwrap().to_string();
    let output_arg = output_file.path().to_str().unwrap().to_string();
    task::spawn_blocking(move || {
        let mut cmd = assert_cmd::cargo_bin_cmd!("sitecast");
        cmd.env(TOKEN_ENV, "mocktoken");
        cmd.args([
            "fetch-snapshot",
            "-p",
            "tunnel",
            "-c",
            &config_arg,
            "-o",
            &output_arg,
        ]);

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains(
                "Failed to fetch snapshot: project not found: tunnel",
            ));
    })
    .await
    .unwrap();
}

#[tokio::test()]
async fn missing_token_is_unauthorized() {
    let addr = snapshot_server();
    let config_file = live_config(addr);
    let output_file = assert_fs::NamedTempFile::new("unauthorized_snapshot.yaml").unwrap();

    let config_arg = config_file.path().to_str().unwrap().to_string();
    let output_arg = output_file.path().to_str().unwrap().to_string();
    task::spawn_blocking(move || {
        let mut cmd = assert_cmd::cargo_bin_cmd!("sitecast");
        cmd.env_remove(TOKEN_ENV);
        cmd.args([
            "fetch-snapshot",
            "-p",
            "harbour-bridge",
            "-c",
            &config_arg,
            "-o",
            &output_arg,
        ]);

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("unauthorized"));
    })
    .await
    .unwrap();
}

#[test]
fn stub_source_needs_no_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = assert_fs::TempDir::new()?;
    let output = temp.child("stub_snapshot.yaml");

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitecast");
    cmd.args(["fetch-snapshot", "-p", "Depot Extension", "-o"])
        .arg(output.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(stub source)"));
    output.assert(predicate::str::contains("project_name: Depot Extension"));
    output.assert(predicate::str::contains("planned_end_date: 2027-03-31"));

    temp.close()?;
    Ok(())
}
