//! Pending flags and overlapping operations on one cooperative thread.
//!
//! `GatedTransport` answers like a tiny in-memory server. Each request is
//! applied to the server state as soon as it arrives, but its response is
//! held until the test releases that method's gate, so the test can look at
//! snapshots while requests are in flight and choose which reply lands first.

use std::cell::RefCell;

use roster_core::{
    ErrorKind, HttpMethod, HttpRequest, HttpResponse, ListSynchronizer, Student, StudentClient,
    StudentId, Transport, TransportError,
};
use tokio::sync::Semaphore;

struct GatedTransport {
    students: RefCell<Vec<Student>>,
    next_id: RefCell<i64>,
    arrivals: Semaphore,
    get_gate: Semaphore,
    post_gate: Semaphore,
    delete_gate: Semaphore,
}

impl GatedTransport {
    fn with_students(students: Vec<Student>) -> Self {
        let next_id = students.len() as i64 + 1;
        Self {
            students: RefCell::new(students),
            next_id: RefCell::new(next_id),
            arrivals: Semaphore::new(0),
            get_gate: Semaphore::new(0),
            post_gate: Semaphore::new(0),
            delete_gate: Semaphore::new(0),
        }
    }

    async fn wait_for_arrival(&self) {
        self.arrivals.acquire().await.unwrap().forget();
    }

    fn gate(&self, method: HttpMethod) -> &Semaphore {
        match method {
            HttpMethod::Get => &self.get_gate,
            HttpMethod::Post => &self.post_gate,
            HttpMethod::Delete => &self.delete_gate,
        }
    }

    fn release(&self, method: HttpMethod, n: usize) {
        self.gate(method).add_permits(n);
    }

    fn respond(&self, req: &HttpRequest) -> HttpResponse {
        let (status, body) = match req.method {
            HttpMethod::Get => (200, serde_json::to_string(&*self.students.borrow()).unwrap()),
            HttpMethod::Post => {
                let input: serde_json::Value =
                    serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                let mut next_id = self.next_id.borrow_mut();
                let student = Student {
                    id: StudentId::Number(*next_id),
                    name: input["name"].as_str().unwrap().to_string(),
                };
                *next_id += 1;
                self.students.borrow_mut().push(student.clone());
                (201, serde_json::to_string(&student).unwrap())
            }
            HttpMethod::Delete => {
                let id: StudentId = req.path.rsplit('/').next().unwrap().parse().unwrap();
                let mut students = self.students.borrow_mut();
                match students.iter().position(|s| s.id == id) {
                    Some(pos) => {
                        students.remove(pos);
                        (204, String::new())
                    }
                    None => (404, String::new()),
                }
            }
        };
        HttpResponse {
            status,
            headers: Vec::new(),
            body,
        }
    }
}

impl Transport for GatedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self.respond(&request);
        self.arrivals.add_permits(1);
        self.gate(request.method)
            .acquire()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?
            .forget();
        Ok(response)
    }
}

fn student(id: i64, name: &str) -> Student {
    Student {
        id: StudentId::Number(id),
        name: name.to_string(),
    }
}

async fn loaded<'a>(transport: &'a GatedTransport) -> ListSynchronizer<&'a GatedTransport> {
    let sync = ListSynchronizer::new(StudentClient::new("http://api.test"), transport);
    transport.release(HttpMethod::Get, 1);
    sync.refresh().await.unwrap();
    transport.wait_for_arrival().await;
    sync
}

#[tokio::test]
async fn flags_are_set_only_while_requests_are_in_flight() {
    let transport = GatedTransport::with_students(vec![student(1, "Ann")]);
    let sync = loaded(&transport).await;
    let ann = StudentId::Number(1);

    let create = sync.create("Bo");
    let observe = async {
        transport.wait_for_arrival().await;
        assert!(sync.snapshot().sync().pending_create());

        // Resubmission is refused without touching the network.
        let err = sync.create("Bo again").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        // A delete can still go out while the create is pending.
        let remove = sync.remove(&ann);
        let check_delete = async {
            transport.wait_for_arrival().await;
            let snap = sync.snapshot();
            assert!(snap.sync().is_delete_pending(&ann));
            assert_eq!(snap.students(), &[student(1, "Ann")]);
            transport.release(HttpMethod::Post, 1);
            transport.release(HttpMethod::Delete, 1);
        };
        let (removed, ()) = tokio::join!(remove, check_delete);
        removed.unwrap();
    };
    let (created, ()) = tokio::join!(create, observe);

    assert_eq!(created.unwrap(), student(2, "Bo"));
    let snap = sync.snapshot();
    assert!(!snap.sync().pending_create());
    assert_eq!(snap.sync().pending_delete_ids().count(), 0);
    assert_eq!(snap.students(), &[student(2, "Bo")]);
}

#[tokio::test]
async fn refresh_after_initial_load_marks_refreshing() {
    let transport = GatedTransport::with_students(vec![student(1, "Ann")]);
    let sync = ListSynchronizer::new(StudentClient::new("http://api.test"), &transport);

    let first = sync.refresh();
    let observe_first = async {
        transport.wait_for_arrival().await;
        assert!(sync.snapshot().sync().is_loading_initial());
        assert!(!sync.snapshot().sync().is_refreshing());
        transport.release(HttpMethod::Get, 1);
    };
    let (first, ()) = tokio::join!(first, observe_first);
    first.unwrap();

    let second = sync.refresh();
    let observe_second = async {
        transport.wait_for_arrival().await;
        assert!(!sync.snapshot().sync().is_loading_initial());
        assert!(sync.snapshot().sync().is_refreshing());
        transport.release(HttpMethod::Get, 1);
    };
    let (second, ()) = tokio::join!(second, observe_second);
    second.unwrap();
    assert!(!sync.snapshot().sync().is_refreshing());
}

#[tokio::test]
async fn overlapping_deletes_of_one_id_are_both_sent() {
    let transport = GatedTransport::with_students(vec![student(1, "Ann"), student(2, "Bo")]);
    let sync = loaded(&transport).await;
    let id = StudentId::Number(1);

    let first = sync.remove(&id);
    let second = sync.remove(&id);
    let observe = async {
        transport.wait_for_arrival().await;
        transport.wait_for_arrival().await;
        assert!(sync.snapshot().sync().is_delete_pending(&id));
        transport.release(HttpMethod::Delete, 2);
    };
    let (first, second, ()) = tokio::join!(first, second, observe);

    // The server accepts one and reports the other as already gone.
    assert_eq!(
        [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(),
        1
    );
    let snap = sync.snapshot();
    assert!(!snap.sync().is_delete_pending(&id));
    assert_eq!(snap.students(), &[student(2, "Bo")]);
}

#[tokio::test]
async fn teardown_while_in_flight_discards_the_result() {
    let transport = GatedTransport::with_students(vec![student(1, "Ann")]);
    let sync = ListSynchronizer::new(StudentClient::new("http://api.test"), &transport);

    let refresh = sync.refresh();
    let tear_down = async {
        transport.wait_for_arrival().await;
        sync.teardown();
        transport.release(HttpMethod::Get, 1);
    };
    let (refreshed, ()) = tokio::join!(refresh, tear_down);

    // The request still ran to completion.
    assert_eq!(refreshed.unwrap(), vec![student(1, "Ann")]);
    assert!(sync.snapshot().students().is_empty());
}

#[tokio::test]
async fn refresh_landing_before_create_reply_keeps_one_row() {
    let transport = GatedTransport::with_students(vec![student(1, "Ann")]);
    let sync = loaded(&transport).await;
    sync.set_draft("Bo");

    let create = sync.submit_draft();
    let interleave = async {
        // The POST is committed on the server; its reply is still held.
        transport.wait_for_arrival().await;

        let refresh = sync.refresh();
        let release_refresh = async {
            transport.wait_for_arrival().await;
            transport.release(HttpMethod::Get, 1);
        };
        let (refreshed, ()) = tokio::join!(refresh, release_refresh);
        assert_eq!(refreshed.unwrap(), vec![student(1, "Ann"), student(2, "Bo")]);

        let snap = sync.snapshot();
        assert!(snap.sync().pending_create());
        assert_eq!(snap.students(), &[student(1, "Ann"), student(2, "Bo")]);

        transport.release(HttpMethod::Post, 1);
    };
    let (created, ()) = tokio::join!(create, interleave);

    assert_eq!(created.unwrap(), student(2, "Bo"));
    let snap = sync.snapshot();
    assert_eq!(snap.students(), &[student(1, "Ann"), student(2, "Bo")]);
    assert!(!snap.sync().pending_create());
    assert!(!snap.sync().is_refreshing());
    assert_eq!(snap.draft(), "");
    assert!(snap.notice().is_none());
}

#[tokio::test]
async fn refresh_landing_before_delete_reply_clears_the_row_once() {
    let transport = GatedTransport::with_students(vec![student(1, "Ann"), student(2, "Bo")]);
    let sync = loaded(&transport).await;
    let ann = StudentId::Number(1);

    let remove = sync.remove(&ann);
    let interleave = async {
        transport.wait_for_arrival().await;

        let refresh = sync.refresh();
        let release_refresh = async {
            transport.wait_for_arrival().await;
            transport.release(HttpMethod::Get, 1);
        };
        let (refreshed, ()) = tokio::join!(refresh, release_refresh);
        refreshed.unwrap();

        // The row is already gone but the delete is still outstanding.
        let snap = sync.snapshot();
        assert_eq!(snap.students(), &[student(2, "Bo")]);
        assert!(snap.sync().is_delete_pending(&ann));

        transport.release(HttpMethod::Delete, 1);
    };
    let (removed, ()) = tokio::join!(remove, interleave);

    removed.unwrap();
    let snap = sync.snapshot();
    assert_eq!(snap.students(), &[student(2, "Bo")]);
    assert!(!snap.sync().is_delete_pending(&ann));
    assert!(!snap.sync().is_refreshing());
    assert!(snap.notice().is_none());
}

#[tokio::test]
async fn create_reply_landing_before_stale_refresh_is_replaced_until_next_refresh() {
    let transport = GatedTransport::with_students(vec![student(1, "Ann")]);
    let sync = loaded(&transport).await;
    sync.set_draft("Bo");

    // The refresh is answered from the server state before the POST commits.
    let refresh = sync.refresh();
    let interleave = async {
        transport.wait_for_arrival().await;

        let create = sync.submit_draft();
        let release_create = async {
            transport.wait_for_arrival().await;
            transport.release(HttpMethod::Post, 1);
        };
        let (created, ()) = tokio::join!(create, release_create);
        assert_eq!(created.unwrap(), student(2, "Bo"));

        let snap = sync.snapshot();
        assert_eq!(snap.students(), &[student(1, "Ann"), student(2, "Bo")]);
        assert!(!snap.sync().pending_create());
        assert_eq!(snap.draft(), "");
        assert!(snap.sync().is_refreshing());

        transport.release(HttpMethod::Get, 1);
    };
    let (refreshed, ()) = tokio::join!(refresh, interleave);

    // Full replace: the stale listing wins until the next refresh.
    assert_eq!(refreshed.unwrap(), vec![student(1, "Ann")]);
    assert_eq!(sync.snapshot().students(), &[student(1, "Ann")]);
    assert!(sync.snapshot().notice().is_none());

    transport.release(HttpMethod::Get, 1);
    sync.refresh().await.unwrap();
    assert_eq!(sync.snapshot().students(), &[student(1, "Ann"), student(2, "Bo")]);
    assert!(!sync.snapshot().sync().is_refreshing());
}
