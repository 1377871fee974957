use appdrop_api_client::ApiClient;
use appdrop_core::Credentials;
use mockito::{Matcher, Server};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const APP_SEARCH_PATH: &str = "/API/mam/apps/search";
const GROUP_SEARCH_PATH: &str = "/API/system/groups/search";

fn client(server: &Server) -> ApiClient {
    ApiClient::new(
        &server.url(),
        "tenant-key",
        &Credentials::new("admin", "secret"),
    )
    .unwrap()
}

#[tokio::test]
async fn group_search_returns_all_matches() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", GROUP_SEARCH_PATH)
        .match_query(Matcher::UrlEncoded("name".into(), "Corp Labs".into()))
        .match_header("aw-tenant-code", "tenant-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "LocationGroups": [
                    {"Id": {"Value": 570}, "Uuid": "6f1d", "Name": "Corp Labs", "Country": "Belgium"},
                    {"Id": {"Value": 812}, "Uuid": "77aa", "Name": "Corp Labs EU"}
                ],
                "Page": 0, "PageSize": 500, "Total": 2
            }"#,
        )
        .create_async()
        .await;

    let groups = client(&server).search_groups("Corp Labs").await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[1].id.value, 812);
    mock.assert_async().await;
}

#[tokio::test]
async fn app_search_follows_pages_and_keeps_exact_names() {
    let mut server = Server::new_async().await;
    let page0 = server
        .mock("GET", APP_SEARCH_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("applicationname".into(), "Acme Agent".into()),
            Matcher::UrlEncoded("locationgroupid".into(), "570".into()),
            Matcher::UrlEncoded("platform".into(), "WinRT".into()),
            Matcher::UrlEncoded("page".into(), "0".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "Application": [
                    {"ApplicationName": "Acme Agent", "ApplicationFileName": "AcmeAgent.MSI", "AppVersion": "4.1", "BundleId": "b-41"},
                    {"ApplicationName": "Acme Agent Beta", "ApplicationFileName": "AcmeAgentBeta.MSI", "AppVersion": "5.0", "BundleId": "b-beta"}
                ],
                "Page": 0, "PageSize": 2, "Total": 3
            }"#,
        )
        .expect(1)
        .create_async()
        .await;
    let page1 = server
        .mock("GET", APP_SEARCH_PATH)
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "Application": [
                    {"ApplicationName": "Acme Agent", "ApplicationFileName": "AcmeAgent.MSI", "AppVersion": "4.2", "BundleId": "b-42"}
                ],
                "Page": 1, "PageSize": 2, "Total": 3
            }"#,
        )
        .expect(1)
        .create_async()
        .await;

    let apps = client(&server)
        .search_applications("Acme Agent", 570, "WinRT")
        .await
        .unwrap();

    let bundles: Vec<_> = apps.iter().map(|a| a.bundle_id.as_str()).collect();
    assert_eq!(bundles, vec!["b-41", "b-42"]);
    page0.assert_async().await;
    page1.assert_async().await;
}

#[tokio::test]
async fn app_search_no_content_means_no_results() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", APP_SEARCH_PATH)
        .match_query(Matcher::Any)
        .with_status(204)
        .create_async()
        .await;

    let apps = client(&server)
        .search_applications("Brand New", 570, "WinRT")
        .await
        .unwrap();
    assert!(apps.is_empty());
}

#[tokio::test]
async fn unauthorized_search_is_a_session_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", APP_SEARCH_PATH)
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body("Unauthorized")
        .create_async()
        .await;

    let err = client(&server)
        .search_applications("Acme Agent", 570, "WinRT")
        .await
        .unwrap_err();
    assert!(err.is_auth_failure());
    assert!(err.into_search_error().is_fatal());
}

#[tokio::test]
async fn unreachable_server_is_a_session_failure() {
    // Nothing listens on the discard port.
    let api = ApiClient::new(
        "http://127.0.0.1:9",
        "tenant-key",
        &Credentials::new("admin", "secret"),
    )
    .unwrap();

    let err = api.search_groups("Corp").await.unwrap_err();
    assert!(err.is_connectivity(), "{err}");
    assert!(err.into_search_error().is_fatal());
}

#[tokio::test]
async fn connection_lost_while_reading_results_is_a_session_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Announces a body longer than what is sent, then hangs up.
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 512\r\n\r\n{\"Application\": [",
            )
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let api = ApiClient::new(
        &format!("http://{}", addr),
        "tenant-key",
        &Credentials::new("admin", "secret"),
    )
    .unwrap();

    let err = api
        .search_applications("Acme Agent", 570, "WinRT")
        .await
        .unwrap_err();
    assert!(err.is_connectivity(), "{err}");
    assert!(err.into_search_error().is_fatal());
}

#[tokio::test]
async fn server_error_on_search_is_not_fatal() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", APP_SEARCH_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"errorCode": 1000, "message": "Search index rebuilding"}"#)
        .create_async()
        .await;

    let err = client(&server)
        .search_applications("Acme Agent", 570, "WinRT")
        .await
        .unwrap_err();
    assert_eq!(err.server_message(), "Search index rebuilding");
    assert!(!err.into_search_error().is_fatal());
}
