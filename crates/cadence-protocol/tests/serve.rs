//! End-to-end tests of the internal scheme over a real install tree.

use std::sync::Arc;

use cadence_protocol::{
    LocalResourceRouter, POLICY_VIOLATION_BODY, ProtocolRegistry, ResourceRequest, RootSpec,
    SchemePrivileges, is_safe,
};
use cadence_test::{MockFetcher, SECRET_CONTENTS, TestInstall, setup_test_logging_default, test_roots};
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};

fn registry(install: &TestInstall) -> ProtocolRegistry {
    let mut registry = ProtocolRegistry::new();
    registry
        .register_privileged_scheme(SchemePrivileges::standard_secure("app"))
        .unwrap();
    registry
        .initialize(LocalResourceRouter::new(install.roots(), "index.html"))
        .unwrap();
    registry
}

async fn get(registry: &ProtocolRegistry, uri: &str) -> http::Response<Vec<u8>> {
    let req = ResourceRequest::from_uri("app", Method::GET, uri).unwrap();
    registry.handle(&req).await
}

#[tokio::test]
async fn serves_index_for_every_bundle_host() {
    setup_test_logging_default();
    let install = TestInstall::new().unwrap();
    let registry = registry(&install);

    for host in ["updater", "main", "titlebar", "settings"] {
        let response = get(&registry, &format!("app://{host}/")).await;
        assert_eq!(response.status(), StatusCode::OK, "{host}");
        assert_eq!(response.body(), format!("<html>{host}</html>").as_bytes());
        assert!(
            response.headers()[CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
    }
}

#[tokio::test]
async fn serves_nested_file_and_shared_assets() {
    let install = TestInstall::new().unwrap();
    let registry = registry(&install);

    let js = get(&registry, "app://main/js/app.js").await;
    assert_eq!(js.status(), StatusCode::OK);
    assert_eq!(js.body(), b"console.log('main');");

    let icon = get(&registry, "app://settings/assets/icon.svg").await;
    assert_eq!(icon.status(), StatusCode::OK);
    assert_eq!(icon.body(), b"<svg/>");
}

#[tokio::test]
async fn assets_host_is_not_directly_reachable() {
    let install = TestInstall::new().unwrap();
    let registry = registry(&install);

    let response = get(&registry, "app://assets/icon.svg").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(response.body(), POLICY_VIOLATION_BODY.as_bytes());
}

#[tokio::test]
async fn encoded_traversal_is_a_policy_violation() {
    let install = TestInstall::new().unwrap();
    let registry = registry(&install);

    for uri in [
        "app://main/..%2f..%2fsecret.txt",
        "app://main/js%2f..%2f..%2f..%2fsecret.txt",
        "app://main/assets/..%2f..%2fsecret.txt",
    ] {
        let response = get(&registry, uri).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
        assert_ne!(response.body(), SECRET_CONTENTS.as_bytes(), "{uri}");
    }
}

#[tokio::test]
async fn literal_dot_segments_never_leave_the_root() {
    let install = TestInstall::new().unwrap();
    let registry = registry(&install);

    // The URI parser collapses these before the router sees them.
    let response = get(&registry, "app://main/../../secret.txt").await;
    assert_ne!(response.status(), StatusCode::OK);
    assert_ne!(response.body(), SECRET_CONTENTS.as_bytes());
}

#[tokio::test]
async fn backslash_traversal_is_a_policy_violation() {
    let install = TestInstall::new().unwrap();
    let registry = registry(&install);

    let response = registry
        .handle(&ResourceRequest::get("main", "/..\\..\\secret.txt"))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let install = TestInstall::new().unwrap();
    let registry = registry(&install);

    let response = get(&registry, "app://main/nope.css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn head_returns_headers_only() {
    let install = TestInstall::new().unwrap();
    let registry = registry(&install);

    let req = ResourceRequest::from_uri("app", Method::HEAD, "app://main/js/app.js").unwrap();
    let response = registry.handle(&req).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body().is_empty());
}

#[tokio::test]
async fn from_http_request() {
    let install = TestInstall::new().unwrap();
    let registry = registry(&install);

    let request = http::Request::builder()
        .method(Method::GET)
        .uri("app://titlebar/index.html")
        .body(())
        .unwrap();
    let req = ResourceRequest::from_http("app", &request).unwrap();
    let response = registry.handle(&req).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Every path the fetcher is ever asked for lies inside the root of the
/// request's host.
#[tokio::test]
async fn fetched_paths_stay_inside_their_root() {
    let roots = test_roots();
    let fetcher = MockFetcher::new();
    let router = LocalResourceRouter::with_fetcher(Arc::clone(&roots), "index.html", fetcher.clone());

    let hosts = ["updater", "main", "titlebar", "settings", "assets", "MAIN", "x"];
    let paths = [
        "",
        "/",
        "/index.html",
        "/a/b/../c.js",
        "/../x",
        "/a/../../x",
        "/assets/",
        "/assets/x.png",
        "/assets/../x",
        "/assets/assets/../../x",
        "/./././x",
        "//x",
        "/\\x",
        "/C:/x",
        "/x\0y",
    ];

    for host in hosts {
        for path in paths {
            let before = fetcher.fetched().len();
            let response = router.handle(&ResourceRequest::get(host, path)).await;
            let fetched = fetcher.fetched();

            match fetched.get(before..).and_then(<[_]>::last) {
                Some(last) => {
                    assert_eq!(response.status(), StatusCode::OK);
                    let inside = RootSpec::ALL
                        .into_iter()
                        .map(|r| roots.dir(r))
                        .any(|dir| last.starts_with(dir) && last != dir);
                    assert!(inside, "{host}{path} -> {}", last.display());
                },
                None => assert_eq!(response.status(), StatusCode::FORBIDDEN, "{host}{path}"),
            }
        }
    }
}

#[test]
fn guard_examples() {
    let root = std::path::Path::new("/opt/cadence/ui/main");
    assert!(is_safe(root, "index.html"));
    assert!(is_safe(root, "a/b/../c.js"));
    assert!(!is_safe(root, "../secret"));
    assert!(!is_safe(root, ""));
    assert!(!is_safe(root, "/etc/passwd"));
}
