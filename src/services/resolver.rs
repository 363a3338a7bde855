use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Database;
use serde::Serialize;
use std::time::Duration;
use rocket_okapi::okapi::schemars::JsonSchema;

use crate::models::{Hotel, Location, Package, RefKind};

/// Per-lookup deadline, read from config once at ignite and managed as
/// Rocket state.
pub struct ResolverSettings {
    pub deadline: Duration,
}

/// Common display shape all tagged references resolve to, whatever
/// collection they point into.
#[derive(Debug, Serialize, Clone, PartialEq, JsonSchema)]
pub struct DisplayProjection {
    pub name: String,
    pub images: Vec<String>,
    pub district: String,
}

/// Outcome of resolving one tagged reference. A stale, malformed or slow
/// reference resolves to NotFound; it never fails the rest of the batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Found(DisplayProjection),
    NotFound,
}

impl Resolved {
    pub fn into_option(self) -> Option<DisplayProjection> {
        match self {
            Resolved::Found(projection) => Some(projection),
            Resolved::NotFound => None,
        }
    }
}

fn project_hotel(hotel: Hotel) -> DisplayProjection {
    DisplayProjection {
        name: hotel.name,
        images: hotel.images,
        district: hotel.district,
    }
}

// Packages have no district field; the legacy data shape fills in a fixed
// placeholder and clients render it as the package's region.
fn project_package(package: Package) -> DisplayProjection {
    DisplayProjection {
        name: package.title,
        images: package.images,
        district: "Jharkhand".to_string(),
    }
}

fn project_location(location: Location) -> DisplayProjection {
    DisplayProjection {
        name: location.name,
        images: location.images,
        district: location.district,
    }
}

/// Resolves one `{type, item_id}` reference against the collection its type
/// dispatches to. Lookup errors and misses both come back as NotFound.
pub async fn resolve(db: &Database, item_type: &str, item_id: &str) -> Resolved {
    let Ok(object_id) = ObjectId::parse_str(item_id) else {
        return Resolved::NotFound;
    };
    let filter = doc! { "_id": object_id };

    match RefKind::from_tag(item_type) {
        RefKind::Hotel => match db.collection::<Hotel>("hotels").find_one(filter, None).await {
            Ok(Some(hotel)) => Resolved::Found(project_hotel(hotel)),
            _ => Resolved::NotFound,
        },
        RefKind::Package => match db.collection::<Package>("packages").find_one(filter, None).await {
            Ok(Some(package)) => Resolved::Found(project_package(package)),
            _ => Resolved::NotFound,
        },
        RefKind::Explore => match db.collection::<Location>("locations").find_one(filter, None).await {
            Ok(Some(location)) => Resolved::Found(project_location(location)),
            _ => Resolved::NotFound,
        },
    }
}

/// Same as [`resolve`], bounded by a per-lookup deadline. A lookup that
/// misses the deadline counts as NotFound instead of stalling the batch.
pub async fn resolve_with_deadline(
    db: &Database,
    item_type: &str,
    item_id: &str,
    deadline: Duration,
) -> Resolved {
    match tokio::time::timeout(deadline, resolve(db, item_type, item_id)).await {
        Ok(resolved) => resolved,
        Err(_) => Resolved::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime;

    fn sample_hotel() -> Hotel {
        Hotel {
            id: Some(ObjectId::new()),
            name: "Ranchi Residency".to_string(),
            description: "City-centre stay".to_string(),
            images: vec!["h1.jpg".to_string()],
            district: "Ranchi".to_string(),
            address: None,
            price_per_night: Some(2400.0),
            rating: 0.0,
            num_reviews: 0,
            reviews: Vec::new(),
            is_approved: true,
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        }
    }

    fn sample_package() -> Package {
        Package {
            id: Some(ObjectId::new()),
            title: "Netarhat Weekend".to_string(),
            description: "Two days in the hills".to_string(),
            images: vec!["p1.jpg".to_string(), "p2.jpg".to_string()],
            location: "Netarhat".to_string(),
            price: 5999.0,
            duration_days: 2,
            is_approved: true,
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        }
    }

    #[test]
    fn hotel_projects_its_own_district() {
        let projection = project_hotel(sample_hotel());
        assert_eq!(projection.name, "Ranchi Residency");
        assert_eq!(projection.district, "Ranchi");
        assert_eq!(projection.images, vec!["h1.jpg".to_string()]);
    }

    #[test]
    fn package_remaps_title_and_gets_placeholder_district() {
        let projection = project_package(sample_package());
        assert_eq!(projection.name, "Netarhat Weekend");
        assert_eq!(projection.district, "Jharkhand");
        assert_eq!(projection.images.len(), 2);
    }

    #[test]
    fn garbage_ids_do_not_need_a_round_trip() {
        assert!(ObjectId::parse_str("not-an-object-id").is_err());
    }
}
