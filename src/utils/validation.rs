//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos.
//! Devuelven `ValidationError` genéricos; cada controller decide a qué
//! variante de `AppError` los traduce.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    // Placas colombianas: ABC123 (particular) o ABC12D (motocicleta)
    static ref PLATE_FORMAT: Regex = Regex::new(r"^[A-Z]{3}\d{3}$|^[A-Z]{3}\d{2}[A-Z]$").unwrap();
}

/// Validar coordenadas GPS
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || lat < -90.0 || lat > 90.0 {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !lng.is_finite() || lng < -180.0 || lng > 180.0 {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Normalizar placa: quita separadores y pasa a mayúsculas.
/// Los handlers almacenan siempre la forma normalizada.
pub fn normalize_plate(value: &str) -> String {
    value.replace([' ', '-'], "").to_uppercase()
}

/// Validar formato de placa de vehículo.
/// Acepta separadores (espacio, guion) y minúsculas; normaliza antes de
/// comparar contra el formato.
pub fn validate_plate(value: &str) -> Result<(), ValidationError> {
    let clean_plate = normalize_plate(value);
    if !PLATE_FORMAT.is_match(&clean_plate) {
        let mut error = ValidationError::new("plate");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"ABC123 o ABC12D".to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(5.07, -75.52).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
        assert!(validate_coordinates(91.0, -75.0).is_err());
        assert!(validate_coordinates(45.0, -181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(0).is_ok());
        assert!(validate_non_negative(5).is_ok());
        assert!(validate_non_negative(-1).is_err());
        assert!(validate_non_negative(-0.5_f64).is_err());
    }

    #[test]
    fn test_validate_plate() {
        assert!(validate_plate("ABC123").is_ok());
        assert!(validate_plate("abc-123").is_ok());
        assert!(validate_plate("ABC 12D").is_ok());
        assert!(validate_plate("AB123").is_err());
        assert!(validate_plate("ABCD1234").is_err());
        assert!(validate_plate("123ABC").is_err());
    }

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("abc-123"), "ABC123");
        assert_eq!(normalize_plate("ABC 12D"), "ABC12D");
        assert_eq!(normalize_plate("XYZ789"), "XYZ789");
    }
}
