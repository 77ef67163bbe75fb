//! Link validator concurrency against a slow mock server

use page_analyzer::config::HttpConfig;
use page_analyzer::crawler::{build_http_client, LinkValidator};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Records when each HEAD request reaches the server, then answers slowly
#[derive(Clone)]
struct ArrivalRecorder {
    arrivals: Arc<Mutex<Vec<Instant>>>,
    delay: Duration,
}

impl Respond for ArrivalRecorder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        ResponseTemplate::new(200).set_delay(self.delay)
    }
}

#[tokio::test]
async fn test_in_flight_probes_stay_within_limit() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(150);
    let recorder = ArrivalRecorder {
        arrivals: Arc::new(Mutex::new(Vec::new())),
        delay,
    };
    Mock::given(method("HEAD"))
        .respond_with(recorder.clone())
        .mount(&server)
        .await;

    let client = build_http_client(&HttpConfig::default()).unwrap();
    let validator = LinkValidator::new(client, 2, 4);
    let links: Vec<String> = (0..10)
        .map(|i| format!("{}/slow/{}", server.uri(), i))
        .collect();

    let started = Instant::now();
    let report = validator.validate(links).await;
    let elapsed = started.elapsed();

    assert_eq!(report.probed, 10);
    assert!(report.broken_links.is_empty());

    let mut arrivals = recorder.arrivals.lock().unwrap().clone();
    arrivals.sort();
    assert_eq!(arrivals.len(), 10);

    // A request can only start once an earlier one has been answered, and an
    // answer takes at least `delay`, so no window shorter than `delay` sees
    // more than two arrivals.
    for (i, start) in arrivals.iter().enumerate() {
        let in_window = arrivals[i..]
            .iter()
            .take_while(|t| t.duration_since(*start) < delay)
            .count();
        assert!(
            in_window <= 2,
            "{} probes started within {:?}",
            in_window,
            delay
        );
    }

    // Ten links two at a time need at least five sequential rounds
    assert!(elapsed >= delay * 5, "finished in {:?}", elapsed);
}
