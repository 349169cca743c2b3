pub mod catchers;
pub mod config;
pub mod cors;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod store;
pub mod utils;

use rocket::{Build, Rocket, catchers, routes};
use std::sync::Arc;

use crate::{
    catchers::{bad_request, internal_error, not_found, unprocessable_entity},
    cors::CORS,
    metrics::RequestCounter,
    routes::*,
};

/// Assembles the voter API around `state`. Address and port come from
/// whatever figment the caller configures on top.
pub fn build_rocket(state: AppState) -> Rocket<Build> {
    let counter = RequestCounter(Arc::clone(&state.metrics));

    rocket::build()
        .attach(CORS)
        .attach(counter)
        .manage(state)
        .mount(
            "/",
            routes![
                all_options,
                health,
                list_voters,
                delete_voters,
                get_voter,
                add_voter,
                update_voter,
                delete_voter,
                get_voter_histories,
                get_voter_history,
                add_voter_history,
                update_voter_history,
                delete_voter_history
            ],
        )
        .register(
            "/",
            catchers![bad_request, not_found, unprocessable_entity, internal_error],
        )
}
