//! Fleet lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every endpoint over
//! real HTTP through `ReqwestTransport`. The base URL carries a path prefix,
//! so any call that drops it lands on the server's fallback and fails.

mod common;

use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;

use common::{mock_base_url, start_mock_server};
use esi_core::{
    Client, ClientConfig, Context, Error, FleetInvitation, FleetMemberMovement, FleetSettings,
    I18nOptions, ReqwestTransport, TransportError,
};

const SEED_CHARACTER: i64 = mock_server::SEED_CHARACTER_ID;
const SEED_FLEET: i64 = mock_server::SEED_FLEET_ID;

fn live_client() -> Client<ReqwestTransport> {
    let addr = start_mock_server();
    let config = ClientConfig::new(&mock_base_url(addr))
        .unwrap()
        .with_user_agent("esi-core-tests");
    Client::builder(Arc::new(ReqwestTransport::new(Duration::from_secs(10)).unwrap()))
        .config(config)
        .build()
        .unwrap()
}

#[tokio::test]
async fn fleet_lifecycle() {
    let client = live_client();
    let ctx = Context::background();
    let fleets = client.fleets();

    // Step 1: the seeded character commands the seeded fleet.
    let membership = fleets.get_character_fleet(&ctx, SEED_CHARACTER).await.unwrap();
    assert_eq!(membership.fleet_id, Some(SEED_FLEET));
    assert_eq!(membership.role.as_deref(), Some("fleet_commander"));

    // Step 2: update settings and read them back.
    fleets
        .update(
            &ctx,
            SEED_FLEET,
            &FleetSettings {
                is_free_move: Some(true),
                motd: Some("Form up".to_string()),
            },
        )
        .await
        .unwrap();
    let fleet = fleets.get(&ctx, SEED_FLEET).await.unwrap();
    assert_eq!(fleet.is_free_move, Some(true));
    assert_eq!(fleet.motd.as_deref(), Some("Form up"));

    // Step 3: build a wing with a squad.
    let wing_id = fleets.create_wing(&ctx, SEED_FLEET).await.unwrap();
    fleets
        .rename_wing(&ctx, SEED_FLEET, wing_id, "Logistics")
        .await
        .unwrap();
    let squad_id = fleets.create_squad(&ctx, SEED_FLEET, wing_id).await.unwrap();
    fleets
        .rename_squad(&ctx, SEED_FLEET, squad_id, "Guardians")
        .await
        .unwrap();

    let wings = fleets
        .get_wings(&ctx, SEED_FLEET, Some(&I18nOptions::language("en")))
        .await
        .unwrap();
    let wing = wings
        .iter()
        .find(|w| w.id == Some(wing_id))
        .expect("created wing listed");
    assert_eq!(wing.name.as_deref(), Some("Logistics"));
    assert_eq!(wing.squads.len(), 1);
    assert_eq!(wing.squads[0].name.as_deref(), Some("Guardians"));

    // Step 4: invite, move and kick a pilot.
    let pilot = 2112625428;
    fleets
        .invite(
            &ctx,
            SEED_FLEET,
            &FleetInvitation {
                character_id: pilot,
                role: "squad_member".to_string(),
                squad_id: Some(squad_id),
                wing_id: Some(wing_id),
            },
        )
        .await
        .unwrap();
    fleets
        .move_member(
            &ctx,
            SEED_FLEET,
            pilot,
            &FleetMemberMovement {
                role: "wing_commander".to_string(),
                squad_id: None,
                wing_id: Some(wing_id),
            },
        )
        .await
        .unwrap();

    let members = fleets.get_members(&ctx, SEED_FLEET, None).await.unwrap();
    let moved = members
        .iter()
        .find(|m| m.character_id == Some(pilot))
        .expect("invited pilot listed");
    assert_eq!(moved.role.as_deref(), Some("wing_commander"));
    assert!(moved.join_time.is_some());

    fleets.kick(&ctx, SEED_FLEET, pilot).await.unwrap();
    let members = fleets.get_members(&ctx, SEED_FLEET, None).await.unwrap();
    assert!(members.iter().all(|m| m.character_id != Some(pilot)));

    // Step 5: tear the wing down again.
    fleets.delete_squad(&ctx, SEED_FLEET, squad_id).await.unwrap();
    fleets.delete_wing(&ctx, SEED_FLEET, wing_id).await.unwrap();
    let wings = fleets.get_wings(&ctx, SEED_FLEET, None).await.unwrap();
    assert!(wings.iter().all(|w| w.id != Some(wing_id)));

    assert_eq!(client.rate().remaining, 0);
    assert!(client.rate().reset.is_none());
}

#[tokio::test]
async fn deprecated_character_route_still_decodes() {
    let client = live_client();
    let character = client
        .characters()
        .get(&Context::background(), SEED_CHARACTER)
        .await
        .unwrap();
    assert_eq!(character.name.as_deref(), Some("Pascal"));
    assert_eq!(character.corporation_id, Some(109299958));
    assert!(character.birthday.is_some());
}

#[tokio::test]
async fn failures_report_error_rate() {
    let client = live_client();
    let ctx = Context::background();

    let err = client.characters().get(&ctx, 1).await.unwrap_err();
    let api = err.api().expect("structured error");
    assert_eq!(api.status, 404);
    assert_eq!(api.message, "Character not found");
    assert_eq!(api.rate.remaining, mock_server::ERROR_LIMIT - 1);
    assert!(api.rate.reset.is_some());
    assert_eq!(client.rate(), api.rate);

    let err = client
        .fleets()
        .get_members(&ctx, SEED_FLEET, Some(&I18nOptions::language("xx")))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid language");
    assert_eq!(client.rate().remaining, mock_server::ERROR_LIMIT - 2);
}

#[tokio::test]
async fn structural_errors_recorded_like_any_other() {
    let client = live_client();
    let err = client
        .fleets()
        .kick(&Context::background(), SEED_FLEET, 42)
        .await
        .unwrap_err();
    assert_eq!(err.api().map(|e| e.status), Some(404));
    assert_eq!(client.rate().remaining, mock_server::ERROR_LIMIT - 1);
}

#[tokio::test]
async fn deadline_abandons_slow_route() {
    let client = live_client();
    let ctx = Context::background().with_timeout(Duration::from_millis(200));

    let err = client
        .exec(&ctx, "GET", "v1/slow/", None::<&()>)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DeadlineExceeded(_)));
    assert_eq!(client.rate(), Default::default());
}

#[tokio::test]
async fn transport_timeout_is_reported() {
    let addr = start_mock_server();
    let client = Client::builder(Arc::new(ReqwestTransport::new(Duration::from_millis(200)).unwrap()))
        .config(ClientConfig::new(&mock_base_url(addr)).unwrap())
        .build()
        .unwrap();

    let err = client
        .exec(&Context::background(), "GET", "v1/slow/", None::<&()>)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(TransportError::Timeout)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::builder(Arc::new(ReqwestTransport::new(Duration::from_secs(2)).unwrap()))
        .config(ClientConfig::new(&mock_base_url(addr)).unwrap())
        .build()
        .unwrap();

    let err = client
        .fleets()
        .get(&Context::background(), SEED_FLEET)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(client.rate(), Default::default());
}

/// Answers a single request with `head`, a partial body, then hangs up.
fn truncating_server(head: &'static str, partial: &'static str) -> std::net::SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(partial.as_bytes()).unwrap();
    });
    addr
}

#[tokio::test]
async fn truncated_error_body_still_reports_rate() {
    let addr = truncating_server(
        "HTTP/1.1 400 Bad Request\r\n\
         content-type: application/json\r\n\
         content-length: 100\r\n\
         x-esi-error-limit-remain: 7\r\n\
         x-esi-error-limit-reset: 30\r\n\
         \r\n",
        "{\"error\":",
    );
    let client = Client::builder(Arc::new(ReqwestTransport::new(Duration::from_secs(5)).unwrap()))
        .config(ClientConfig::new(&format!("http://{addr}/esi/")).unwrap())
        .build()
        .unwrap();

    let err = client
        .fleets()
        .get(&Context::background(), SEED_FLEET)
        .await
        .unwrap_err();

    let api = err.api().expect("structured error");
    assert_eq!(api.status, 400);
    assert_eq!(api.message, "");
    assert_eq!(client.rate().remaining, 7);
    assert!(client.rate().reset.is_some());
}
