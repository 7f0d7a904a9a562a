//! A minimal service.
//!
//! ```text
//! cargo run -p webstrap --example hello -- --config application.yaml
//! curl localhost:8080/hello
//! curl 'localhost:8080/users/42?verbose=yes'
//! ```

use std::process::ExitCode;

use serde::Serialize;
use webstrap::prelude::*;

#[derive(Serialize)]
struct User {
    id: u64,
    name: String,
    verbose: bool,
}

#[derive(Default)]
struct HelloService {
    greeting: String,
}

impl Application for HelloService {
    fn init(&mut self, settings: &Settings) -> anyhow::Result<()> {
        self.greeting = settings.get("hello.greeting").string("Hello, World!");
        Ok(())
    }

    fn initialize_routes(&self, router: &mut Router<Handler>) {
        let greeting = self.greeting.clone();
        router.route(
            Method::GET,
            "/hello",
            handler(move |_req| {
                let greeting = greeting.clone();
                async move { respond_with_json(StatusCode::OK, &greeting) }
            }),
        );

        router.route(
            Method::GET,
            "/users/{id}",
            handler(|req| async move {
                let id = param_as_u64(&req, "id", 0);
                if id == 0 {
                    return respond_with_error(StatusCode::BAD_REQUEST, "id must be a positive integer");
                }
                let user = User {
                    id,
                    name: query_param_as_string(&req, "name", "anonymous"),
                    verbose: query_param_as_bool(&req, "verbose", false),
                };
                respond_with_json(StatusCode::OK, &user)
            }),
        );
    }

    fn cleanup(&mut self) -> anyhow::Result<()> {
        tracing::info!("hello service stopped");
        Ok(())
    }

    fn properties(&self) -> Properties {
        Properties::new(
            "hello",
            "A hello world web service",
            "Serves a greeting at /hello and echoes users at /users/{id}",
        )
    }
}

fn main() -> ExitCode {
    webstrap::execute(HelloService::default())
}
