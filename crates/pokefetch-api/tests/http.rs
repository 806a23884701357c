//! End-to-end checks of the HTTP data source against a local responder

use pokefetch_api::{
    CONNECTION_ERROR_MESSAGE, DataSource, ErrorKind, LookupError, NOT_FOUND_MESSAGE,
    PokeApiClient,
};
use reqwest::blocking::Client;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use url::Url;

const CHARIZARD: &str = include_str!("fixtures/charizard.json");

struct Canned {
    status: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Canned {
    fn json(status: &'static str, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
        }
    }
}

/// Serve each canned response to one connection, in order.
/// Returns the base URL and a channel of received request lines.
fn serve(responses: Vec<Canned>) -> (Url, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for canned in responses {
            let (mut stream, _) = listener.accept().unwrap();

            let mut reader = BufReader::new(&stream);
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
            }
            let _ = tx.send(request_line.trim_end().to_string());

            let head = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                canned.status,
                canned.content_type,
                canned.body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&canned.body).unwrap();
            stream.flush().unwrap();
        }
    });

    let base = Url::parse(&format!("http://127.0.0.1:{}/api/v2", port)).unwrap();
    (base, rx)
}

fn client(base: Url) -> PokeApiClient {
    let http = Client::builder().no_proxy().build().unwrap();
    PokeApiClient::with_client(base, http)
}

#[test]
fn test_lookup_success() {
    let (base, requests) = serve(vec![Canned::json("200 OK", CHARIZARD)]);

    let result = client(base).lookup("charizard").unwrap();

    assert_eq!(
        requests.recv().unwrap(),
        "GET /api/v2/pokemon/charizard HTTP/1.1"
    );
    assert_eq!(result.name, "charizard");
    assert_eq!(result.id, 6);
    assert_eq!(result.height, 17);
    assert_eq!(result.weight, 905);
    assert_eq!(result.base_experience, Some(267));
    assert_eq!(
        result.type_names().collect::<Vec<_>>(),
        vec!["fire", "flying"]
    );
    assert!(
        result
            .sprites
            .front_shiny
            .as_deref()
            .is_some_and(|s| s.ends_with("/shiny/6.png"))
    );
}

#[test]
fn test_lookup_not_found() {
    let (base, _requests) = serve(vec![Canned::json("404 Not Found", "Not Found")]);

    let err = client(base).lookup("missingno").unwrap_err();

    assert!(matches!(err, LookupError::NotFound));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), NOT_FOUND_MESSAGE);
}

#[test]
fn test_lookup_server_error() {
    let (base, _requests) = serve(vec![Canned::json("500 Internal Server Error", "")]);

    let err = client(base).lookup("pikachu").unwrap_err();

    assert!(matches!(err, LookupError::Status(s) if s.as_u16() == 500));
    assert_eq!(err.kind(), ErrorKind::Connectivity);
    assert_eq!(err.to_string(), CONNECTION_ERROR_MESSAGE);
}

#[test]
fn test_malformed_body_is_connectivity() {
    let (base, _requests) = serve(vec![Canned {
        status: "200 OK",
        content_type: "text/html",
        body: b"<html>maintenance</html>".to_vec(),
    }]);

    let err = client(base).lookup("pikachu").unwrap_err();

    assert!(matches!(err, LookupError::Decode(_)));
    assert_eq!(err.to_string(), CONNECTION_ERROR_MESSAGE);
}

#[test]
fn test_connection_refused_is_connectivity() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base = Url::parse(&format!("http://127.0.0.1:{}", port)).unwrap();

    let err = client(base).lookup("pikachu").unwrap_err();

    assert!(matches!(err, LookupError::Transport(_)));
    assert_eq!(err.to_string(), CONNECTION_ERROR_MESSAGE);
}

#[test]
fn test_fetch_sprite() {
    let (base, requests) = serve(vec![Canned {
        status: "200 OK",
        content_type: "image/png",
        body: vec![0x89, b'P', b'N', b'G'],
    }]);
    let sprite_url = base.join("/sprites/6.png").unwrap().to_string();

    let bytes = client(base).fetch_sprite(&sprite_url).unwrap();

    assert_eq!(requests.recv().unwrap(), "GET /sprites/6.png HTTP/1.1");
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
}
