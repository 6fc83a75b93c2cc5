// vetmed-e2e - End-to-end checks for the VetMed Pro HTTP API
//
// Copyright (c) 2025 Stephen Harrison
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Request payloads sent by the suite. The backend speaks Spanish field
//! names, so the structs rename on the wire.

use chrono::{DateTime, Duration, Local, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Registration payload for a Mexican veterinary professional
#[derive(Clone, Debug, Serialize)]
pub struct VetProfile {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    /// Professional license; all digits and longer than six characters
    #[serde(rename = "cedula_profesional")]
    pub license: String,
    #[serde(rename = "especialidad")]
    pub specialty: String,
    #[serde(rename = "años_experiencia")]
    pub years_experience: u32,
    #[serde(rename = "institucion")]
    pub institution: String,
}

impl VetProfile {
    /// A fresh profile whose email and license embed an 8-digit id, so
    /// repeated runs never collide on registration.
    pub fn generate() -> Self {
        let unique_id = numeric_id();
        VetProfile {
            name: "Dr. María Elena Rodríguez Hernández".to_string(),
            email: format!("maria.rodriguez.{unique_id}@veterinaria.mx"),
            phone: "+52 55 1234 5678".to_string(),
            license: format!("1234{unique_id}"),
            specialty: "Medicina Interna de Pequeñas Especies".to_string(),
            years_experience: 8,
            institution: "Universidad Nacional Autónoma de México (UNAM)".to_string(),
        }
    }

    pub fn credentials(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            license: self.license.clone(),
        }
    }
}

/// First eight decimal digits of a random v4 UUID
fn numeric_id() -> String {
    Uuid::new_v4().as_u128().to_string().chars().take(8).collect()
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "cedula_profesional")]
    pub license: String,
}

impl LoginRequest {
    /// Credentials that were never registered
    pub fn fabricated() -> Self {
        LoginRequest {
            email: "invalid@email.com".to_string(),
            license: "000000".to_string(),
        }
    }
}

/// Clinical intake for a consultation
#[derive(Clone, Debug, Serialize)]
pub struct ConsultationIntake {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "nombre_mascota")]
    pub pet_name: String,
    #[serde(rename = "nombre_dueño")]
    pub owner_name: String,
    #[serde(rename = "raza")]
    pub breed: String,
    #[serde(rename = "edad")]
    pub age: String,
    #[serde(rename = "peso")]
    pub weight: String,
    #[serde(rename = "condicion_corporal")]
    pub body_condition: String,
    #[serde(rename = "sexo")]
    pub sex: String,
    #[serde(rename = "estado_reproductivo")]
    pub reproductive_status: String,
    #[serde(rename = "vacunas_vigentes")]
    pub vaccines_current: String,
    #[serde(rename = "detalle_paciente")]
    pub patient_details: String,
}

impl ConsultationIntake {
    pub fn canine_vomiting_case() -> Self {
        ConsultationIntake {
            date: Local::now().format("%Y-%m-%d").to_string(),
            pet_name: "Firulais".to_string(),
            owner_name: "Juan Pérez".to_string(),
            breed: "Pastor Alemán".to_string(),
            age: "5 años".to_string(),
            weight: "32 kg".to_string(),
            body_condition: "NORMAL".to_string(),
            sex: "MACHO".to_string(),
            reproductive_status: "ENTERO".to_string(),
            vaccines_current: "SI".to_string(),
            patient_details: concat!(
                "Vómitos recurrentes y pérdida de apetito desde hace 3 días. ",
                "Vómitos amarillentos, letargia, rechazo al alimento, deshidratación leve. ",
                "Tratamientos previos: ayuno de 12 horas, suero oral."
            )
            .to_string(),
        }
    }
}

/// Examination notes sent along with an analysis request
#[derive(Clone, Debug, Serialize)]
pub struct ClinicalObservations {
    #[serde(rename = "parametros_vitales")]
    pub vital_signs: String,
    #[serde(rename = "ambiente_manejo")]
    pub environment: String,
    #[serde(rename = "laboratorio_estudios")]
    pub lab_studies: String,
    #[serde(rename = "notas_adicionales")]
    pub notes: String,
}

impl ClinicalObservations {
    pub fn canine_vomiting_case() -> Self {
        ClinicalObservations {
            vital_signs: "FC: 110 lpm, FR: 28 rpm, T: 39.2°C, mucosas pálidas".to_string(),
            environment: "Perro doméstico, alimentación con croquetas premium, acceso a jardín"
                .to_string(),
            lab_studies: "Pendientes: hemograma completo, química sanguínea".to_string(),
            notes: "Propietario refiere que el perro comió algo en el parque hace 4 días"
                .to_string(),
        }
    }
}

/// Body of `POST /consultations`
#[derive(Clone, Debug, Serialize)]
pub struct ConsultationRequest<'a> {
    pub veterinarian_id: &'a str,
    pub category: &'a str,
    pub consultation_data: &'a ConsultationIntake,
}

/// Body of `POST /payments/checkout/session`
#[derive(Clone, Debug, Serialize)]
pub struct CheckoutRequest<'a> {
    pub package_id: &'a str,
    pub origin_url: &'a str,
}

/// Membership fields written straight into the store to stand in for a
/// completed payment.
#[derive(Clone, Debug, PartialEq)]
pub struct MembershipGrant {
    pub membership_type: String,
    pub consultations_remaining: i32,
    pub membership_expires: DateTime<Utc>,
}

impl MembershipGrant {
    pub fn basic(now: DateTime<Utc>) -> Self {
        MembershipGrant {
            membership_type: "basic".to_string(),
            consultations_remaining: 10,
            membership_expires: now + Duration::days(365),
        }
    }
}

/// All fixture data for one run, generated once up front
#[derive(Clone, Debug)]
pub struct Fixtures {
    pub vet: VetProfile,
    pub consultation: ConsultationIntake,
    pub observations: ClinicalObservations,
}

impl Fixtures {
    pub fn generate() -> Self {
        Fixtures {
            vet: VetProfile::generate(),
            consultation: ConsultationIntake::canine_vomiting_case(),
            observations: ClinicalObservations::canine_vomiting_case(),
        }
    }
}
