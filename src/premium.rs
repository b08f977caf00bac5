//! Premium calculation
//!
//! A quote is the vehicle's base rate plus the package surcharge. Both inputs
//! arrive as free text from the client and are parsed case-insensitively.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType {
    Car,
    Motorcycle,
    Truck,
    CamperVan,
}

impl VehicleType {
    pub fn base_rate(self) -> f64 {
        match self {
            VehicleType::Car => 5000.0,
            VehicleType::Motorcycle => 3000.0,
            VehicleType::Truck => 10000.0,
            VehicleType::CamperVan => 7000.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::Car => "CAR",
            VehicleType::Motorcycle => "MOTORCYCLE",
            VehicleType::Truck => "TRUCK",
            VehicleType::CamperVan => "CAMPER_VAN",
        }
    }
}

impl FromStr for VehicleType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "car" => Ok(VehicleType::Car),
            "motorcycle" | "bike" => Ok(VehicleType::Motorcycle),
            "truck" => Ok(VehicleType::Truck),
            "camper van" | "campervan" => Ok(VehicleType::CamperVan),
            _ => Err(ValidationError::UnknownVariant(
                "vehicleType".to_string(),
                s.trim().to_string(),
            )),
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyPackage {
    Basic,
    Comprehensive,
    ComprehensivePlus,
    Premium,
}

impl PolicyPackage {
    pub fn surcharge(self) -> f64 {
        match self {
            PolicyPackage::Basic => 1000.0,
            PolicyPackage::Comprehensive => 1500.0,
            PolicyPackage::ComprehensivePlus => 2000.0,
            PolicyPackage::Premium => 2500.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyPackage::Basic => "BASIC",
            PolicyPackage::Comprehensive => "COMPREHENSIVE",
            PolicyPackage::ComprehensivePlus => "COMPREHENSIVE_PLUS",
            PolicyPackage::Premium => "PREMIUM",
        }
    }
}

impl FromStr for PolicyPackage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "basic" | "basic third party" => Ok(PolicyPackage::Basic),
            "comprehensive" => Ok(PolicyPackage::Comprehensive),
            "comprehensive plus" => Ok(PolicyPackage::ComprehensivePlus),
            "premium" => Ok(PolicyPackage::Premium),
            _ => Err(ValidationError::UnknownVariant(
                "policyPackage".to_string(),
                s.trim().to_string(),
            )),
        }
    }
}

impl fmt::Display for PolicyPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-case, treat `_`/`-` as spaces and collapse runs of whitespace.
fn normalise(s: &str) -> String {
    s.replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn calculate_premium(vehicle: VehicleType, package: PolicyPackage) -> f64 {
    vehicle.base_rate() + package.surcharge()
}

/// Parses both client strings and prices them in one step.
pub fn quote(vehicle_type: &str, policy_package: &str) -> Result<f64, ValidationError> {
    let vehicle = vehicle_type.parse::<VehicleType>()?;
    let package = policy_package.parse::<PolicyPackage>()?;
    Ok(calculate_premium(vehicle, package))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_quotes() {
        assert_eq!(quote("car", "premium").unwrap(), 7500.0);
        assert_eq!(quote("truck", "basic").unwrap(), 11000.0);
        assert_eq!(quote("motorcycle", "premium").unwrap(), 5500.0);
        assert_eq!(quote("TRUCK", "premium").unwrap(), 12500.0);
        assert_eq!(quote("motorcycle", "basic").unwrap(), 4000.0);
        assert_eq!(quote("camper van", "premium").unwrap(), 9500.0);
    }

    #[test]
    fn test_parsing_is_lenient_about_case_and_separators() {
        assert_eq!("Bike".parse::<VehicleType>().unwrap(), VehicleType::Motorcycle);
        assert_eq!("CAMPER_VAN".parse::<VehicleType>().unwrap(), VehicleType::CamperVan);
        assert_eq!(
            "Comprehensive  Plus".parse::<PolicyPackage>().unwrap(),
            PolicyPackage::ComprehensivePlus
        );
        assert_eq!(
            "Basic Third Party".parse::<PolicyPackage>().unwrap(),
            PolicyPackage::Basic
        );
    }

    #[test]
    fn test_unknown_inputs_are_rejected() {
        let err = quote("hovercraft", "basic").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownVariant("vehicleType".to_string(), "hovercraft".to_string())
        );
        assert!(quote("car", "gold").is_err());
    }

    #[test]
    fn test_packages_are_strictly_ordered() {
        let car = VehicleType::Car;
        let tiers = [
            PolicyPackage::Basic,
            PolicyPackage::Comprehensive,
            PolicyPackage::ComprehensivePlus,
            PolicyPackage::Premium,
        ];
        for pair in tiers.windows(2) {
            assert!(calculate_premium(car, pair[0]) < calculate_premium(car, pair[1]));
        }
    }
}
