use std::fs;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use super::*;
use crate::config::SiteConfig;
use crate::page::{PageRegistry, Render, renderer};
use crate::utils::mime::types;

const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc>https://test.com/</loc></url><url><loc>https://test.com/foo</loc></url><url><loc>https://test.com/nested/</loc></url><url><loc>https://test.com/nested/foo</loc></url><url><loc>https://test.com/nested/nested/</loc></url><url><loc>https://test.com/nested/nested/bar</loc></url></urlset>"#;

fn text(body: &'static str) -> Render {
    renderer(move |w| w.write_all(body.as_bytes()))
}

struct Site {
    _dir: TempDir,
    router: Router,
}

fn site(base_path: &str, configure: impl FnOnce(SiteConfig) -> SiteConfig) -> Site {
    let dir = TempDir::new().unwrap();
    let public = dir.path().join("public");
    fs::create_dir_all(public.join("img")).unwrap();
    fs::write(public.join("testfile.txt"), "Hello from static text file").unwrap();
    fs::write(public.join("img/cat.svg"), "<svg/>").unwrap();
    fs::write(dir.path().join("secret.txt"), "secret").unwrap();

    let config = configure(
        SiteConfig::new("test.com")
            .with_assets_dir(&public)
            .with_base_path(base_path),
    );

    let mut registry = PageRegistry::new(base_path);
    for (path, body) in [
        ("/index.html", "<h1>Index Page</h1>"),
        ("/foo.htm", "<h1>Foo Page</h1>"),
        ("/nested/index.htm", "<h1>Nested Index Page</h1>"),
        ("/nested/foo.htm", "<h1>Nested Foo Page</h1>"),
        ("/nested/nested/index.html", "<h1>Nested nested Index Page</h1>"),
        ("/nested/nested/bar.html", "<h1>Nested nested Bar Page</h1>"),
        ("/textfile-endpoint.txt", "example text response"),
    ] {
        registry.register(path, text(body)).unwrap();
    }

    Site {
        router: Router::new(&config, &registry),
        _dir: dir,
    }
}

fn get(router: &Router, url: &str) -> (u16, String) {
    let reply = router.respond(url);
    (reply.status, reply.text().into_owned())
}

#[test]
fn test_serves_every_alias() {
    let site = site("", |c| c);
    for (url, body) in [
        ("/", "<h1>Index Page</h1>"),
        ("/index.html", "<h1>Index Page</h1>"),
        ("/index", "<h1>Index Page</h1>"),
        ("/foo", "<h1>Foo Page</h1>"),
        ("/foo.htm", "<h1>Foo Page</h1>"),
        ("/nested/foo.htm", "<h1>Nested Foo Page</h1>"),
        ("/nested/foo", "<h1>Nested Foo Page</h1>"),
        ("/nested/index.htm", "<h1>Nested Index Page</h1>"),
        ("/nested/index", "<h1>Nested Index Page</h1>"),
        ("/nested", "<h1>Nested Index Page</h1>"),
        ("/nested/", "<h1>Nested Index Page</h1>"),
        ("/nested/nested/bar.html", "<h1>Nested nested Bar Page</h1>"),
        ("/nested/nested/bar", "<h1>Nested nested Bar Page</h1>"),
        ("/nested/nested/index", "<h1>Nested nested Index Page</h1>"),
        ("/nested/nested", "<h1>Nested nested Index Page</h1>"),
        ("/nested/nested/", "<h1>Nested nested Index Page</h1>"),
        ("/textfile-endpoint.txt", "example text response"),
        ("/testfile.txt", "Hello from static text file"),
        ("/sitemap.xml", SITEMAP),
    ] {
        assert_eq!(get(&site.router, url), (200, body.to_string()), "{url}");
    }
}

#[test]
fn test_unknown_paths_are_not_found() {
    let site = site("", |c| c);
    for url in ["/nope", "/nested/nope", "/nested/nested/nope", "/textfile-endpoint"] {
        let (status, body) = get(&site.router, url);
        assert_eq!(status, 404, "{url}");
        assert!(body.contains("404 Not Found"));
        assert!(!body.contains("outside the configured base path"));
    }
}

#[test]
fn test_content_types() {
    let site = site("", |c| c);
    assert_eq!(site.router.respond("/foo").content_type, types::HTML);
    assert_eq!(
        site.router.respond("/textfile-endpoint.txt").content_type,
        types::PLAIN
    );
    assert_eq!(site.router.respond("/sitemap.xml").content_type, types::XML);
    assert_eq!(site.router.respond("/img/cat.svg").content_type, types::SVG);
    assert_eq!(site.router.respond("/nope").content_type, types::HTML);
}

#[test]
fn test_query_string_ignored() {
    let site = site("", |c| c);
    assert_eq!(
        get(&site.router, "/foo?ref=home#top"),
        (200, "<h1>Foo Page</h1>".to_string())
    );
    assert_eq!(get(&site.router, "/?utm=x").0, 200);
}

#[test]
fn test_asset_traversal_refused() {
    let site = site("", |c| c);
    assert_eq!(get(&site.router, "/../secret.txt").0, 404);
    assert_eq!(get(&site.router, "/%2e%2e/secret.txt").0, 404);
    assert_eq!(get(&site.router, "/img/%2E%2E/%2E%2E/secret.txt").0, 404);
}

#[test]
fn test_sitemap_disabled() {
    let site = site("", SiteConfig::without_sitemap);
    assert_eq!(get(&site.router, "/sitemap.xml").0, 404);
}

#[test]
fn test_robots_served() {
    let site = site("", SiteConfig::with_robots_txt);
    let (status, body) = get(&site.router, "/robots.txt");
    assert_eq!(status, 200);
    assert!(body.contains("Sitemap: https://test.com/sitemap.xml"));
}

#[test]
fn test_base_path_routes() {
    let site = site("/docs", |c| c);
    for (url, body) in [
        ("/docs/", "<h1>Index Page</h1>"),
        ("/docs/index", "<h1>Index Page</h1>"),
        ("/docs/index.html", "<h1>Index Page</h1>"),
        ("/docs/foo", "<h1>Foo Page</h1>"),
        ("/docs/nested", "<h1>Nested Index Page</h1>"),
        ("/docs/nested/", "<h1>Nested Index Page</h1>"),
        ("/docs/testfile.txt", "Hello from static text file"),
    ] {
        assert_eq!(get(&site.router, url), (200, body.to_string()), "{url}");
    }

    let (status, body) = get(&site.router, "/docs/sitemap.xml");
    assert_eq!(status, 200);
    assert!(body.contains("<loc>https://test.com/docs/</loc>"));
    assert!(body.contains("<loc>https://test.com/docs/nested/nested/bar</loc>"));
}

#[test]
fn test_requests_outside_base_path() {
    let site = site("/docs", |c| c);
    for url in ["/", "/foo", "/testfile.txt", "/sitemap.xml", "/docsite/foo"] {
        let (status, body) = get(&site.router, url);
        assert_eq!(status, 404, "{url}");
        assert!(body.contains("outside the configured base path"), "{url}");
        assert!(body.contains("<code>/docs</code>"));
    }

    let (status, body) = get(&site.router, "/docs/nope");
    assert_eq!(status, 404);
    assert!(!body.contains("outside the configured base path"));
}

#[test]
fn test_render_failure_is_500() {
    let dir = TempDir::new().unwrap();
    let config = SiteConfig::new("test.com").with_assets_dir(dir.path());
    let mut registry = PageRegistry::new("");
    registry
        .register(
            "/broken.html",
            renderer(|_| Err(std::io::Error::other("missing data file"))),
        )
        .unwrap();
    let router = Router::new(&config, &registry);

    let (status, body) = get(&router, "/broken");
    assert_eq!(status, 500);
    assert!(body.contains("missing data file"));
}

#[test]
fn test_render_panic_is_500() {
    let dir = TempDir::new().unwrap();
    let config = SiteConfig::new("test.com").with_assets_dir(dir.path());
    let mut registry = PageRegistry::new("");
    registry
        .register("/boom.html", renderer(|_| panic!("template exploded")))
        .unwrap();
    let router = Router::new(&config, &registry);

    let reply = respond_guarded(&router, "/boom");
    assert_eq!(reply.status, 500);
    assert!(reply.text().contains("template exploded"));
}

#[test]
fn test_dispatch_variants() {
    let site = site("", |c| c);
    assert!(matches!(site.router.dispatch("/"), Dispatch::Page(p) if p.path() == "/index.html"));
    assert!(matches!(site.router.dispatch("/sitemap.xml"), Dispatch::Document(_)));
    assert!(matches!(site.router.dispatch("/testfile.txt"), Dispatch::Asset(_)));
    assert!(matches!(
        site.router.dispatch("/nope"),
        Dispatch::NotFound {
            outside_base: false
        }
    ));
}

#[test]
fn test_router_without_root_page() {
    let dir = TempDir::new().unwrap();
    let config = SiteConfig::new("test.com").with_assets_dir(dir.path());
    let mut registry = PageRegistry::new("");
    registry.register("/about.html", text("about")).unwrap();
    let router = Router::new(&config, &registry);

    assert_eq!(get(&router, "/").0, 404);
    assert_eq!(router.route_count(), 2);
}

fn raw_request(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    stream.write_all(request.as_bytes()).unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

#[test]
fn test_serves_over_http() {
    let site = site("", |c| c);
    let bound = bind("127.0.0.1:0", site.router).unwrap();
    let addr = bound.addr();
    let handle = bound.shutdown_handle();
    let worker = thread::spawn(move || bound.run_request_loop());

    let response = raw_request(
        addr,
        "GET /nested/ HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains("text/html; charset=utf-8"));
    assert!(response.ends_with("<h1>Nested Index Page</h1>"));

    let response = raw_request(
        addr,
        "HEAD /foo HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(!response.contains("Foo Page"));

    let response = raw_request(
        addr,
        "GET /missing HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert!(response.starts_with("HTTP/1.1 404"), "{response}");

    handle.shutdown();
    worker.join().unwrap().unwrap();
}

#[test]
fn test_server_survives_render_panic() {
    let dir = TempDir::new().unwrap();
    let config = SiteConfig::new("test.com").with_assets_dir(dir.path());
    let mut registry = PageRegistry::new("");
    registry
        .register("/boom.html", renderer(|_| panic!("template exploded")))
        .unwrap();
    registry.register("/ok.html", text("still here")).unwrap();

    let bound = bind("127.0.0.1:0", Router::new(&config, &registry)).unwrap();
    let addr = bound.addr();
    let handle = bound.shutdown_handle();
    let worker = thread::spawn(move || bound.run_request_loop());

    let response = raw_request(
        addr,
        "GET /boom HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert!(response.starts_with("HTTP/1.1 500"), "{response}");

    let response = raw_request(
        addr,
        "GET /ok HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("still here"));

    handle.shutdown();
    worker.join().unwrap().unwrap();
}

#[test]
fn test_bind_failure() {
    let taken = bind("127.0.0.1:0", Preview::new(".", "")).unwrap();
    let addr = taken.addr().to_string();

    let err = bind(&addr, Preview::new(".", "")).err().unwrap();
    assert!(matches!(err, ServeError::Bind { .. }));
    assert!(err.to_string().contains(&addr));
}
