//! HTTP relay against a real listener and a real UDP receiver

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;

use kelp_relay::{RelayConfig, RelayServer, RelayState};
use kelp_wire::PhoneSample;

const LAN_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3));

struct Harness {
    base: String,
    receiver: UdpSocket,
    state: Arc<RelayState>,
    client: reqwest::Client,
}

async fn start(static_dir: Option<PathBuf>) -> Harness {
    let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    let mut config = RelayConfig {
        destination: receiver.local_addr().unwrap(),
        ..RelayConfig::default()
    };
    if let Some(dir) = static_dir {
        config.static_dir = dir;
    }

    let bind: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let server = RelayServer::bind(bind, &config, LAN_IP).await.unwrap();
    let base = format!("http://{}", server.local_addr().unwrap());
    let state = server.state();
    tokio::spawn(server.serve());

    Harness {
        base,
        receiver,
        state,
        client: reqwest::Client::new(),
    }
}

fn allow_origin(resp: &reqwest::Response) -> Option<&str> {
    resp.headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_gyro_is_relayed_over_udp() {
    let h = start(None).await;

    let resp = h
        .client
        .post(format!("{}/gyro", h.base))
        .header("Content-Type", "application/json")
        .body(r#"{"x": 12.5, "y": -4, "z": 0.5, "grabButton": true}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(allow_origin(&resp), Some("*"));
    assert_eq!(resp.text().await.unwrap(), "OK");

    let mut buf = [0u8; 1024];
    let (len, _) = tokio::time::timeout(Duration::from_secs(2), h.receiver.recv_from(&mut buf))
        .await
        .unwrap()
        .unwrap();

    let relayed: serde_json::Value = serde_json::from_slice(&buf[..len]).unwrap();
    assert_eq!(
        relayed,
        serde_json::json!({
            "x": 12.5, "y": -4, "z": 0.5,
            "grabButton": true, "highlightButton": false
        })
    );
    assert_eq!(PhoneSample::from_json(&buf[..len]).unwrap().y, -4);
    assert_eq!(h.state.stats().samples_relayed, 1);
}

#[tokio::test]
async fn test_null_field_is_relayed_unchanged() {
    let h = start(None).await;

    let resp = h
        .client
        .post(format!("{}/gyro", h.base))
        .body(r#"{"x": null, "y": 1, "z": 2, "grabButton": false}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let mut buf = [0u8; 1024];
    let (len, _) = tokio::time::timeout(Duration::from_secs(2), h.receiver.recv_from(&mut buf))
        .await
        .unwrap()
        .unwrap();

    let relayed: serde_json::Value = serde_json::from_slice(&buf[..len]).unwrap();
    assert_eq!(
        relayed,
        serde_json::json!({
            "x": null, "y": 1, "z": 2,
            "grabButton": false, "highlightButton": false
        })
    );
}

#[tokio::test]
async fn test_bad_gyro_body_is_500() {
    let h = start(None).await;

    let resp = h
        .client
        .post(format!("{}/gyro", h.base))
        .body("not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    assert!(resp.text().await.unwrap().starts_with("Error: "));
    assert_eq!(h.state.stats().relay_failures, 1);
    assert_eq!(h.state.stats().samples_relayed, 0);
}

#[tokio::test]
async fn test_api_ip() {
    let h = start(None).await;

    let resp = h
        .client
        .get(format!("{}/api/ip", h.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(allow_origin(&resp), Some("*"));

    let body: serde_json::Value = resp.json().await.unwrap();
    let http_port: u16 = h.base.rsplit(':').next().unwrap().parse().unwrap();
    let gyro_port = h.state.destination().port();

    assert_eq!(body["ip"], "10.1.2.3");
    assert_eq!(body["port"], http_port);
    assert_eq!(body["gyroPort"], gyro_port);
}

#[tokio::test]
async fn test_pages_get_local_ip() {
    let h = start(None).await;

    for path in ["/", "/phone_controller.html", "/buttons", "/phone_buttons_controller.html"] {
        let resp = h
            .client
            .get(format!("{}{}", h.base, path))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200, "{}", path);
        let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));

        let html = resp.text().await.unwrap();
        assert!(html.contains(r#"value="10.1.2.3""#), "{}", path);
        assert!(!html.contains(r#"value="192.168.1.100""#), "{}", path);
    }
    assert_eq!(h.state.stats().pages_served, 4);
}

#[tokio::test]
async fn test_missing_page_is_404() {
    let h = start(Some(PathBuf::from("/nonexistent/kelp/static"))).await;

    let resp = h.client.get(format!("{}/buttons", h.base)).send().await.unwrap();

    assert_eq!(resp.status(), 404);
    assert!(resp.text().await.unwrap().contains("phone_buttons_controller.html"));
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let h = start(None).await;

    let resp = h
        .client
        .get(format!("{}/admin", h.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(allow_origin(&resp), Some("*"));

    let wrong_method = h.client.get(format!("{}/gyro", h.base)).send().await.unwrap();
    assert_eq!(wrong_method.status(), 404);
}

#[tokio::test]
async fn test_cors_preflight() {
    let h = start(None).await;

    for path in ["/gyro", "/anything"] {
        let resp = h
            .client
            .request(reqwest::Method::OPTIONS, format!("{}{}", h.base, path))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        assert_eq!(allow_origin(&resp), Some("*"));
        assert_eq!(
            resp.headers()["access-control-allow-methods"],
            "POST, OPTIONS"
        );
        assert_eq!(resp.headers()["access-control-allow-headers"], "Content-Type");
    }
}
