use crate::utils::error::{RentalError, Result};
use crate::utils::validation::{validate_non_negative_rate, validate_positive};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::fmt;

/// Discriminator written for cars in the persisted document.
pub const CAR_TAG: &str = "Voiture";
/// Discriminator written for motorcycles in the persisted document.
pub const MOTORCYCLE_TAG: &str = "Moto";

pub const DEFAULT_DOOR_COUNT: u32 = 4;
pub const DEFAULT_DISPLACEMENT_CC: u32 = 500;

const LONG_RENTAL_DAYS: u32 = 7;
const LONG_RENTAL_FACTOR: f64 = 0.9;
const LARGE_ENGINE_CC: u32 = 600;
const LARGE_ENGINE_FACTOR: f64 = 1.15;

#[derive(Debug, Clone, PartialEq)]
pub enum VehicleKind {
    Car { door_count: u32 },
    Motorcycle { engine_displacement_cc: u32 },
}

impl VehicleKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Car { .. } => CAR_TAG,
            Self::Motorcycle { .. } => MOTORCYCLE_TAG,
        }
    }
}

/// A rentable asset. The shared fields live here; what differs between cars
/// and motorcycles is carried by [`VehicleKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub brand: String,
    pub model: String,
    pub year: u32,
    pub daily_rate: f64,
    pub registration_id: Option<String>,
    pub kind: VehicleKind,
    available: bool,
}

impl Vehicle {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: u32,
        daily_rate: f64,
        kind: VehicleKind,
    ) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            year,
            daily_rate,
            registration_id: None,
            kind,
            available: true,
        }
    }

    pub fn car(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: u32,
        daily_rate: f64,
        door_count: u32,
    ) -> Self {
        Self::new(brand, model, year, daily_rate, VehicleKind::Car { door_count })
    }

    pub fn motorcycle(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: u32,
        daily_rate: f64,
        engine_displacement_cc: u32,
    ) -> Self {
        Self::new(
            brand,
            model,
            year,
            daily_rate,
            VehicleKind::Motorcycle {
                engine_displacement_cc,
            },
        )
    }

    pub fn with_registration(mut self, registration_id: impl Into<String>) -> Self {
        self.registration_id = Some(registration_id.into());
        self
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Availability setter for loosely-typed input (CLI arguments, raw JSON).
    /// Anything but a JSON boolean is rejected and leaves the flag untouched.
    pub fn set_availability_value(&mut self, state: &Value) -> Result<()> {
        match state.as_bool() {
            Some(flag) => {
                self.available = flag;
                Ok(())
            }
            None => Err(RentalError::invalid_argument(
                "available",
                format!("expected a boolean, got {}", state),
            )),
        }
    }

    /// Total price for `days` days. Cars get 10% off above one week,
    /// motorcycles above 600cc pay 15% more. No rounding is applied.
    pub fn rental_price(&self, days: u32) -> f64 {
        let mut total = self.daily_rate * f64::from(days);
        match self.kind {
            VehicleKind::Car { .. } if days > LONG_RENTAL_DAYS => total *= LONG_RENTAL_FACTOR,
            VehicleKind::Motorcycle {
                engine_displacement_cc,
            } if engine_displacement_cc > LARGE_ENGINE_CC => total *= LARGE_ENGINE_FACTOR,
            _ => {}
        }
        total
    }

    pub fn describe(&self) -> String {
        self.to_string()
    }

    pub fn to_document(&self) -> Value {
        let mut doc = json!({
            "type": self.kind.tag(),
            "marque": self.brand,
            "modele": self.model,
            "annee": self.year,
            "prix_journalier": self.daily_rate,
            "disponible": self.available,
            "immatriculation": self.registration_id,
        });
        match self.kind {
            VehicleKind::Car { door_count } => doc["nombre_portes"] = json!(door_count),
            VehicleKind::Motorcycle {
                engine_displacement_cc,
            } => doc["cylindree"] = json!(engine_displacement_cc),
        }
        doc
    }

    /// Rebuilds a vehicle from its document, dispatching on the `type` tag.
    /// A missing or unknown tag yields a 4-door car so that documents written
    /// by older tools keep loading.
    pub fn from_document(doc: &Value) -> Result<Self> {
        let raw = VehicleDocument::deserialize(doc).map_err(|e| RentalError::malformed("", e))?;

        validate_non_negative_rate("prix_journalier", raw.daily_rate)
            .map_err(RentalError::in_document)?;

        let kind = match raw.tag.as_deref() {
            Some(CAR_TAG) => VehicleKind::Car {
                door_count: raw.door_count.unwrap_or(DEFAULT_DOOR_COUNT),
            },
            Some(MOTORCYCLE_TAG) => {
                let engine_displacement_cc =
                    raw.engine_displacement_cc.unwrap_or(DEFAULT_DISPLACEMENT_CC);
                validate_positive("cylindree", engine_displacement_cc)
                    .map_err(RentalError::in_document)?;
                VehicleKind::Motorcycle {
                    engine_displacement_cc,
                }
            }
            other => {
                tracing::warn!(
                    "Unrecognized vehicle type {:?} for {} {}, loading it as a {}-door car",
                    other,
                    raw.brand,
                    raw.model,
                    DEFAULT_DOOR_COUNT
                );
                VehicleKind::Car {
                    door_count: DEFAULT_DOOR_COUNT,
                }
            }
        };

        let mut vehicle = Vehicle::new(raw.brand, raw.model, raw.year, raw.daily_rate, kind);
        vehicle.available = raw.available;
        vehicle.registration_id = raw.registration_id;
        Ok(vehicle)
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            VehicleKind::Car { door_count } => write!(
                f,
                "Car: {} {} ({}) - {} doors - {}/day",
                self.brand, self.model, self.year, door_count, self.daily_rate
            ),
            VehicleKind::Motorcycle {
                engine_displacement_cc,
            } => write!(
                f,
                "Motorcycle: {} {} ({}) - {}cc - {}/day",
                self.brand, self.model, self.year, engine_displacement_cc, self.daily_rate
            ),
        }
    }
}

#[derive(Deserialize)]
struct VehicleDocument {
    #[serde(rename = "type", default)]
    tag: Option<String>,
    #[serde(rename = "marque")]
    brand: String,
    #[serde(rename = "modele")]
    model: String,
    #[serde(rename = "annee", deserialize_with = "deserialize_year")]
    year: u32,
    #[serde(rename = "prix_journalier")]
    daily_rate: f64,
    #[serde(rename = "disponible", default = "default_available")]
    available: bool,
    #[serde(rename = "immatriculation", default)]
    registration_id: Option<String>,
    #[serde(rename = "nombre_portes", default)]
    door_count: Option<u32>,
    #[serde(rename = "cylindree", default)]
    engine_displacement_cc: Option<u32>,
}

fn default_available() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearField {
    Number(u32),
    Text(String),
}

// Older data files stored the year exactly as typed at the prompt.
fn deserialize_year<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match YearField::deserialize(deserializer)? {
        YearField::Number(year) => Ok(year),
        YearField::Text(raw) => raw
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid year '{}'", raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sedan() -> Vehicle {
        Vehicle::car("Toyota", "Corolla", 2020, 20000.0, 4)
    }

    fn big_bike() -> Vehicle {
        Vehicle::motorcycle("Yamaha", "MT-07", 2021, 10000.0, 650)
    }

    #[test]
    fn test_car_discount_starts_after_one_week() {
        let car = sedan();
        assert_eq!(car.rental_price(7), 20000.0 * 7.0);
        assert_eq!(car.rental_price(8), 20000.0 * 8.0 * 0.9);
        assert_eq!(car.rental_price(8), 144000.0);
    }

    #[test]
    fn test_motorcycle_surcharge_above_600cc() {
        assert_eq!(big_bike().rental_price(3), 10000.0 * 3.0 * 1.15);
        assert_eq!(big_bike().rental_price(3), 34500.0);

        let boundary = Vehicle::motorcycle("Honda", "CB600F", 2019, 10000.0, 600);
        assert_eq!(boundary.rental_price(3), 30000.0);
    }

    #[test]
    fn test_motorcycle_ignores_duration() {
        let bike = Vehicle::motorcycle("Honda", "CB500", 2019, 8000.0, 500);
        assert_eq!(bike.rental_price(30), 8000.0 * 30.0);
    }

    #[test]
    fn test_describe_mentions_kind_specific_field() {
        assert_eq!(
            sedan().describe(),
            "Car: Toyota Corolla (2020) - 4 doors - 20000/day"
        );
        assert_eq!(
            big_bike().describe(),
            "Motorcycle: Yamaha MT-07 (2021) - 650cc - 10000/day"
        );
    }

    #[test]
    fn test_set_availability_value_rejects_non_boolean() {
        let mut car = sedan();
        let err = car.set_availability_value(&json!("no")).unwrap_err();
        assert!(matches!(err, RentalError::InvalidArgument { .. }));
        assert!(car.is_available());

        car.set_availability_value(&json!(false)).unwrap();
        assert!(!car.is_available());
    }

    #[test]
    fn test_document_round_trip_keeps_every_field() {
        let mut car = sedan().with_registration("AB-123-CD");
        car.set_available(false);
        let restored = Vehicle::from_document(&car.to_document()).unwrap();
        assert_eq!(restored, car);

        let bike = big_bike();
        let restored = Vehicle::from_document(&bike.to_document()).unwrap();
        assert_eq!(restored, bike);
    }

    #[test]
    fn test_document_uses_persisted_field_names() {
        let doc = big_bike().to_document();
        assert_eq!(doc["type"], "Moto");
        assert_eq!(doc["marque"], "Yamaha");
        assert_eq!(doc["cylindree"], 650);
        assert_eq!(doc["immatriculation"], Value::Null);
        assert!(doc.get("nombre_portes").is_none());
    }

    #[test]
    fn test_unknown_or_missing_tag_falls_back_to_four_door_car() {
        let doc = json!({
            "type": "Camion",
            "marque": "Renault",
            "modele": "Master",
            "annee": 2018,
            "prix_journalier": 30000,
            "nombre_portes": 2
        });
        let vehicle = Vehicle::from_document(&doc).unwrap();
        assert_eq!(vehicle.kind, VehicleKind::Car { door_count: 4 });

        let doc = json!({
            "marque": "Renault",
            "modele": "Clio",
            "annee": 2018,
            "prix_journalier": 15000
        });
        let vehicle = Vehicle::from_document(&doc).unwrap();
        assert_eq!(vehicle.kind, VehicleKind::Car { door_count: 4 });
        assert!(vehicle.is_available());
    }

    #[test]
    fn test_year_may_be_stored_as_text() {
        let doc = json!({
            "type": "Moto",
            "marque": "Suzuki",
            "modele": "SV650",
            "annee": "2017",
            "prix_journalier": 9000
        });
        let vehicle = Vehicle::from_document(&doc).unwrap();
        assert_eq!(vehicle.year, 2017);
        assert_eq!(
            vehicle.kind,
            VehicleKind::Motorcycle {
                engine_displacement_cc: DEFAULT_DISPLACEMENT_CC
            }
        );
        assert_eq!(vehicle.to_document()["annee"], 2017);
    }

    fn clio(rate: Value) -> Value {
        json!({
            "type": "Voiture",
            "marque": "R",
            "modele": "Clio",
            "annee": 2018,
            "prix_journalier": rate,
        })
    }

    #[test]
    fn test_malformed_documents_are_reported() {
        let mut missing_brand = clio(json!(1));
        missing_brand.as_object_mut().unwrap().remove("marque");
        assert!(matches!(
            Vehicle::from_document(&missing_brand),
            Err(RentalError::MalformedDocument { .. })
        ));

        match Vehicle::from_document(&clio(json!(-5))) {
            Err(RentalError::MalformedDocument { context, .. }) => {
                assert_eq!(context, "prix_journalier")
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let mut text_flag = clio(json!(5));
        text_flag["disponible"] = json!("oui");
        assert!(Vehicle::from_document(&text_flag).is_err());

        assert!(Vehicle::from_document(&json!([1, 2, 3])).is_err());
    }
}
