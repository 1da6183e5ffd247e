use std::{env, process};

use model::coordinate::Coordinate;
use reporting::{
    asset::rank_by_proximity,
    payload::ServiceRequestPayload,
    source::{FileSource, ResourcePaths},
    ConfigSource, ReportingSession, RequestComposer,
};
use routing::{RoadMatchSettings, RoutingEngine};
use serde_json::json;

const NEARBY_RADIUS_METERS: f64 = 50.0;

fn usage() -> ! {
    eprintln!("usage: playground <service_code> <lat> <lng> [address]");
    eprintln!("       playground --schema");
    process::exit(2);
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.first().map(String::as_str) == Some("--schema") {
        let schema = schemars::schema_for!(ServiceRequestPayload);
        println!("{}", serde_json::to_string_pretty(&schema).unwrap());
        return;
    }
    let (service_code, lat, lng, address) = match args.as_slice() {
        [code, lat, lng, rest @ ..] => match (lat.parse::<f64>(), lng.parse::<f64>()) {
            (Ok(lat), Ok(lng)) => (code.clone(), lat, lng, rest.join(" ")),
            _ => usage(),
        },
        _ => usage(),
    };

    let source = FileSource::new(ResourcePaths::from_env());
    let mut session = ReportingSession::new();
    if let Err(why) = session.load(&source).await {
        log::warn!("could not load reference data: {}", why);
    }

    let services = source.services().await.unwrap_or_else(|why| {
        log::warn!("could not load services: {}", why);
        Vec::new()
    });
    let Some(service) = services
        .into_iter()
        .find(|service| service.service_code == service_code)
    else {
        eprintln!("unknown service code: {}", service_code);
        process::exit(1);
    };

    let point = Coordinate::new(lat, lng);
    let nearby = rank_by_proximity(
        &point,
        session.features_for(&service.service_code),
        NEARBY_RADIUS_METERS,
    );

    let mut composer =
        RequestComposer::new(RoutingEngine::new(RoadMatchSettings::from_env()));
    composer.select_service(service);
    composer.set_address(address);
    composer.set_location(&session, point);

    let result = json!({
        "in_bounds": composer.is_in_bounds(),
        "routing": composer.routing_verdict(),
        "nearby_assets": nearby,
        "payload": composer.build_payload().ok(),
        "error": composer.build_payload().err().map(|why| why.to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&result).unwrap());
}
