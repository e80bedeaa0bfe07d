use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1::Builder as ConnectionBuilder;
use hyper::{header, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tower::service_fn;
use tower::util::BoxCloneService;
use tower::Service as _;
use wildroute::{Config, MatchError, TrailingSlash};

type Body = Full<Bytes>;

// The bindings of the matched route, stored in the request extensions.
#[derive(Clone, Debug, Default)]
struct Bindings(HashMap<String, String>);

impl Bindings {
    fn get(&self, key: &str) -> &str {
        self.0.get(key).map_or("", String::as_str)
    }
}

fn bindings(req: &Request<Incoming>) -> Bindings {
    req.extensions().get::<Bindings>().cloned().unwrap_or_default()
}

// GET /
async fn index(_req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    Ok(Response::new(Body::from("Hello, world!")))
}

// GET /users/{id}
async fn user(req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    let bindings = bindings(&req);
    Ok(Response::new(Body::from(format!("user {}", bindings.get("id")))))
}

// GET /posts/{date:(?<year>[0-9]{4})-(?<month>[0-9]{2})}
async fn posts(req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    let bindings = bindings(&req);
    Ok(Response::new(Body::from(format!(
        "posts from {}/{}",
        bindings.get("month"),
        bindings.get("year")
    ))))
}

// GET /static/{path:*}
async fn files(req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    let bindings = bindings(&req);
    Ok(Response::new(Body::from(format!("file '{}'", bindings.get("path")))))
}

// 404 handler
async fn not_found(_req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Body::default())
        .unwrap())
}

// Redirects to the same path with a trailing slash added or removed.
fn redirect(path: &str, err: MatchError) -> Response<Body> {
    let location = match err {
        MatchError::ExtraTrailingSlash => path.trim_end_matches('/').to_owned(),
        _ => format!("{}/", path),
    };

    Response::builder()
        .status(StatusCode::PERMANENT_REDIRECT)
        .header(header::LOCATION, location)
        .body(Body::default())
        .unwrap()
}

// `BoxCloneService` erases the type of each handler service. It does not
// require `Sync`, hence the `Mutex`.
type Service = Mutex<BoxCloneService<Request<Incoming>, Response<Body>, hyper::Error>>;

// One router per HTTP method, so the same route can be registered for several
// methods.
type Router = HashMap<Method, wildroute::Router<Service>>;

async fn route(router: Arc<Router>, mut req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    // find the subrouter for this request method
    let router = match router.get(req.method()) {
        Some(router) => router,
        // no routes for this method, respond with 405 Method Not Allowed
        None => {
            return Ok(Response::builder()
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .body(Body::default())
                .unwrap())
        }
    };

    let path = req.uri().path().to_owned();
    match router.at(&path) {
        Ok(found) => {
            req.extensions_mut()
                .insert(Bindings(found.params.to_map()));

            // lock the service for a very short time, just to clone it
            let mut service = found.value.lock().unwrap().clone();
            service.call(req).await
        }
        Err(err) if err.tsr() => Ok(redirect(&path, err)),
        Err(_) => not_found(req).await,
    }
}

fn handler<F, Fut>(f: F) -> Service
where
    F: FnMut(Request<Incoming>) -> Fut + Clone + Send + 'static,
    Fut: std::future::Future<Output = hyper::Result<Response<Body>>> + Send + 'static,
{
    Mutex::new(BoxCloneService::new(service_fn(f)))
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Config::default().trailing_slash(TrailingSlash::Redirect);
    let mut router = Router::new();
    let get = router
        .entry(Method::GET)
        .or_insert_with(|| wildroute::Router::with_config(config));

    get.insert("/", handler(index)).unwrap();
    get.insert("/users/{id}", handler(user)).unwrap();
    get.insert(
        "/posts/{date:(?<year>[0-9]{4})-(?<month>[0-9]{2})}",
        handler(posts),
    )
    .unwrap();
    get.insert("/static/{path:*}", handler(files)).unwrap();

    let listener = TcpListener::bind(("127.0.0.1", 3000)).await.unwrap();

    // boilerplate for the hyper service
    let router = Arc::new(router);

    loop {
        let router = router.clone();
        let (tcp, _) = listener.accept().await.unwrap();
        tokio::task::spawn(async move {
            if let Err(err) = ConnectionBuilder::new()
                .serve_connection(
                    TokioIo::new(tcp),
                    hyper::service::service_fn(|request| async {
                        route(router.clone(), request).await
                    }),
                )
                .await
            {
                println!("Error serving connection: {:?}", err);
            }
        });
    }
}
