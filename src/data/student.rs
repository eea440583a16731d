use jiff::civil::{Date, DateTime};
use serde::{Deserialize, Serialize};

pub const COURSES: [&str; 6] = [
    "Matemáticas",
    "Ciencias",
    "Historia",
    "Programación",
    "Data Science",
    "Diseño",
];

pub const LEVELS: [&str; 4] = ["Beginner", "Intermediate", "Advanced", "Expert"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i32,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curso: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nivel: Option<String>,
    pub activo: bool,
    pub fecha_registro: DateTime,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }

    ///`lowercase_term` must already be lowercased; an empty term matches everything
    pub fn matches_search(&self, lowercase_term: &str) -> bool {
        [
            Some(self.nombre.as_str()),
            Some(self.apellido.as_str()),
            Some(self.email.as_str()),
            self.curso.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(lowercase_term))
    }

    ///copy with the active flag flipped, as the list shows it right after a toggle
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            activo: !self.activo,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCreate {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curso: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nivel: Option<String>,
}

///sparse patch - absent fields are left alone by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apellido: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curso: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nivel: Option<String>,
}

impl StudentUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

///server-side filters for the list call; `None` means "don't filter on this"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nivel: Option<String>,
}

#[cfg(test)]
pub fn sample_student(id: i32, nombre: &str, apellido: &str) -> Student {
    Student {
        id,
        nombre: nombre.to_string(),
        apellido: apellido.to_string(),
        email: format!("{}@email.com", nombre.to_lowercase()),
        telefono: None,
        fecha_nacimiento: None,
        curso: None,
        nivel: None,
        activo: true,
        fecha_registro: jiff::civil::date(2024, 9, 1).at(10, 30, 0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_payload() {
        let student: Student = serde_json::from_str(
            r#"{
                "id": 1, "nombre": "Juan", "apellido": "Pérez", "email": "juan@email.com",
                "telefono": "123456789", "curso": "Matemáticas", "nivel": "Básico",
                "activo": true, "fecha_registro": "2025-03-14T09:26:53.589793"
            }"#,
        )
        .expect("valid student");

        assert_eq!(student.id, 1);
        assert_eq!(student.fecha_nacimiento, None);
        assert_eq!(student.curso.as_deref(), Some("Matemáticas"));
        assert_eq!(student.fecha_registro.date(), jiff::civil::date(2025, 3, 14));
    }

    #[test]
    fn create_payload_never_carries_server_fields() {
        let create = StudentCreate {
            nombre: "Ana".into(),
            apellido: "Ruiz".into(),
            email: "ana@email.com".into(),
            telefono: None,
            fecha_nacimiento: Some(jiff::civil::date(2001, 2, 3)),
            curso: Some("Historia".into()),
            nivel: None,
        };
        let json = serde_json::to_value(&create).expect("serializes");
        let obj = json.as_object().expect("object");

        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("fecha_registro"));
        assert!(!obj.contains_key("activo"));
        assert!(!obj.contains_key("telefono"));
        assert_eq!(obj["fecha_nacimiento"], "2001-02-03");
    }

    #[test]
    fn empty_update_serializes_to_empty_object() {
        let update = StudentUpdate::default();
        assert!(update.is_empty());
        assert_eq!(serde_json::to_string(&update).expect("serializes"), "{}");
    }

    #[test]
    fn search_is_case_insensitive_and_skips_missing_course() {
        let mut student = sample_student(1, "María", "García");
        assert!(student.matches_search("marí"));
        assert!(student.matches_search("garc"));
        assert!(student.matches_search("@email"));
        assert!(student.matches_search(""));
        assert!(!student.matches_search("science"));

        student.curso = Some("Data Science".into());
        assert!(student.matches_search("science"));
    }

    #[test]
    fn toggled_only_flips_active() {
        let student = sample_student(3, "Carlos", "López");
        let toggled = student.toggled();
        assert!(!toggled.activo);
        assert_eq!(toggled.id, student.id);
        assert_eq!(toggled.fecha_registro, student.fecha_registro);
        assert_eq!(toggled.toggled(), student);
    }
}
