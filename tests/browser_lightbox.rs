//! Browser tests of the rendered page.
//!
//! The page is written by the binary into a temporary site and served over a
//! local HTTP server (ES modules do not load from file://). Markup tests run
//! without the wasm bundle. Behavior tests need `wasm-pack build --target web
//! --features wasm` to have produced `pkg/`; they skip themselves otherwise.
//!
//! Run with: `cargo test --test browser_lightbox -- --ignored`

#![cfg(not(target_arch = "wasm32"))]

use headless_chrome::{Browser, LaunchOptions, Tab};
use std::io::{Read as _, Write as _};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

// ===========================================================================
// Minimal HTTP server
// ===========================================================================

struct TestServer {
    port: u16,
    _stop: std::sync::mpsc::Sender<()>,
}

impl TestServer {
    fn start(root: PathBuf) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = std::sync::mpsc::channel::<()>();

        thread::spawn(move || {
            listener.set_nonblocking(true).unwrap();
            loop {
                if rx.try_recv().is_ok() {
                    break;
                }
                match listener.accept() {
                    Ok((stream, _)) => {
                        let root = root.clone();
                        thread::spawn(move || serve_request(stream, &root));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Self { port, _stop: tx }
    }

    fn url(&self) -> String {
        format!("http://127.0.0.1:{}/dist/index.html", self.port)
    }
}

fn serve_request(mut stream: std::net::TcpStream, root: &Path) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 4096];
    let n = match stream.read(&mut buf) {
        Ok(n) if n > 0 => n,
        _ => return,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request.split_whitespace().nth(1).unwrap_or("/");
    let file_path = root.join(path.trim_start_matches('/'));

    let (status, body, ct) = if file_path.is_file() {
        let body = std::fs::read(&file_path).unwrap_or_default();
        let ext = file_path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let ct = match ext {
            "html" => "text/html; charset=utf-8",
            "js" => "application/javascript",
            "wasm" => "application/wasm",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "pdf" => "application/pdf",
            _ => "application/octet-stream",
        };
        ("200 OK", body, ct)
    } else {
        ("404 Not Found", b"Not Found".to_vec(), "text/plain")
    };

    let header = format!(
        "HTTP/1.1 {status}\r\n\
         Content-Type: {ct}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(&body);
}

// ===========================================================================
// Setup helpers
// ===========================================================================

/// Site layout served from the temp root:
///
/// ```text
/// dist/index.html          # rendered page
/// dist/images/project-07.png
/// dist/pkg/                # copied wasm bundle, when built
/// ```
fn build_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    std::fs::write(
        root.join("config.toml"),
        r#"
# Image-only: how an embed reports a 404 varies by viewer
extensions = ["jpg", "png", "webp"]

[[cards]]
number = 7
title = "Harbor"
aspect_ratio = "4 / 5"
classes = ["cream"]

[[cards]]
number = 8
title = "Missing"

[[cards]]
number = 9
title = "Plain"
zoomable = false
"#,
    )
    .unwrap();

    let dist = root.join("dist");
    let status = Command::new(env!("CARGO_BIN_EXE_gallery-lightbox"))
        .args([
            "render",
            "--source",
            root.to_str().unwrap(),
            "--output",
            dist.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run gallery-lightbox");
    assert!(status.success(), "page render failed");

    let images = dist.join("images");
    std::fs::create_dir_all(&images).unwrap();
    image::RgbImage::from_pixel(160, 90, image::Rgb([90, 120, 150]))
        .save(images.join("project-07.png"))
        .unwrap();

    if let Some(pkg) = wasm_pkg() {
        let target = dist.join("pkg");
        std::fs::create_dir_all(&target).unwrap();
        for entry in std::fs::read_dir(pkg).unwrap() {
            let entry = entry.unwrap();
            if entry.path().is_file() {
                std::fs::copy(entry.path(), target.join(entry.file_name())).unwrap();
            }
        }
    }
    tmp
}

fn wasm_pkg() -> Option<PathBuf> {
    let pkg = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("pkg");
    pkg.join("gallery_lightbox_bg.wasm").is_file().then_some(pkg)
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1000, 1000)),
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn open_page(server: &TestServer) -> std::sync::Arc<Tab> {
    let tab = browser().new_tab().unwrap();
    tab.navigate_to(&server.url())
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    tab
}

fn eval_string(tab: &Tab, js: &str) -> String {
    tab.evaluate(js, true)
        .unwrap()
        .value
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn eval_bool(tab: &Tab, js: &str) -> bool {
    tab.evaluate(js, true)
        .unwrap()
        .value
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

/// Poll `js` until it returns true. Panics after 5 s.
fn wait_for(tab: &Tab, js: &str) {
    for _ in 0..100 {
        if eval_bool(tab, js) {
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
    panic!("timed out waiting for: {js}");
}

// ===========================================================================
// Markup contract
// ===========================================================================

#[test]
#[ignore]
fn page_renders_cards_in_columns() {
    let site = build_site();
    let server = TestServer::start(site.path().to_path_buf());
    let tab = open_page(&server);

    let count = eval_string(
        &tab,
        "String(document.querySelectorAll('.gallery-col .art').length)",
    );
    assert_eq!(count, "3");
    let columns = eval_string(&tab, "String(document.querySelectorAll('.gallery-col').length)");
    assert_eq!(columns, "3");
    let zoomable = eval_string(
        &tab,
        "String(document.querySelectorAll('.zoomable .canvas').length)",
    );
    assert_eq!(zoomable, "2");
}

#[test]
#[ignore]
fn overlay_starts_hidden() {
    let site = build_site();
    let server = TestServer::start(site.path().to_path_buf());
    let tab = open_page(&server);

    let hidden = eval_string(
        &tab,
        "document.getElementById('lightbox').getAttribute('aria-hidden')",
    );
    assert_eq!(hidden, "true");
    assert!(eval_bool(
        &tab,
        "getComputedStyle(document.getElementById('lightbox')).pointerEvents === 'none'"
    ));
}

#[test]
#[ignore]
fn surfaces_declare_aspect_ratio() {
    let site = build_site();
    let server = TestServer::start(site.path().to_path_buf());
    let tab = open_page(&server);

    let ratio = eval_string(
        &tab,
        "getComputedStyle(document.querySelector('.canvas.cream')).aspectRatio",
    );
    assert_eq!(ratio, "4 / 5");
}

// ===========================================================================
// Behavior (requires pkg/)
// ===========================================================================

#[test]
#[ignore]
fn preview_resolves_and_lightbox_opens() {
    if wasm_pkg().is_none() {
        eprintln!("skipping: pkg/ not built");
        return;
    }
    let site = build_site();
    let server = TestServer::start(site.path().to_path_buf());
    let tab = open_page(&server);

    wait_for(
        &tab,
        "document.querySelector('.canvas.cream').classList.contains('has-image')",
    );
    assert_eq!(
        eval_string(
            &tab,
            "String(document.querySelectorAll('.canvas.cream img.paper-image').length)"
        ),
        "1"
    );

    tab.evaluate("document.querySelector('.canvas.cream').click()", false)
        .unwrap();
    wait_for(&tab, "document.getElementById('lightbox').classList.contains('open')");

    // Natural ratio 16:9 in a near-square window is width-bound
    wait_for(
        &tab,
        "document.querySelector('.lightbox-card').style.width === Math.floor(innerWidth * 0.82) + 'px'",
    );
    let class_name = eval_string(&tab, "document.querySelector('.lightbox-card').className");
    assert!(class_name.contains("lightbox-card"));
    assert!(class_name.contains("cream"));
    assert!(!class_name.contains("canvas"));

    tab.evaluate(
        "document.dispatchEvent(new KeyboardEvent('keydown', { key: 'Escape' }))",
        false,
    )
    .unwrap();
    wait_for(&tab, "!document.getElementById('lightbox').classList.contains('open')");
    assert_eq!(
        eval_string(&tab, "document.querySelector('.lightbox-card').style.transform"),
        "none"
    );
}

#[test]
#[ignore]
fn missing_assets_leave_no_preview() {
    if wasm_pkg().is_none() {
        eprintln!("skipping: pkg/ not built");
        return;
    }
    let site = build_site();
    let server = TestServer::start(site.path().to_path_buf());
    let tab = open_page(&server);

    // Card 8 has no assets
    thread::sleep(Duration::from_millis(1000));
    let surface = "document.querySelectorAll('.canvas')[1]";
    assert!(!eval_bool(
        &tab,
        &format!("{surface}.classList.contains('has-image') || {surface}.classList.contains('has-pdf')")
    ));
    assert_eq!(
        eval_string(&tab, &format!("String({surface}.children.length)")),
        "0"
    );
}
