use crate::{
    api::AlumnosApi,
    dashboard::StudentEvent,
    data::{
        Student, StudentCreate, StudentUpdate,
        student::{COURSES, LEVELS},
    },
    error::{AlumnosResult, ParseDateSnafu},
    maud_conveniences::{
        Toast, form_submit_button, modal, select_element, simple_form_element, title,
    },
    routes::{
        dashboard::{reconcile_mutation, toast_only},
        student_list::find_student,
    },
    state::{AlumnosState, ClientDashboard},
};
use axum::{
    Form,
    extract::{Path, State},
    response::Response,
};
use jiff::civil::Date;
use maud::{Markup, html};
use serde::Deserialize;
use snafu::ResultExt;

///flat, editable copy of a student - every field is whatever the input box holds
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    pub fecha_nacimiento: String,
    pub curso: String,
    pub nivel: String,
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn parse_date(s: &str) -> AlumnosResult<Option<Date>> {
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<Date>()
        .context(ParseDateSnafu { original: s })
        .map(Some)
}

///`new` if it differs from `old`, otherwise nothing
fn changed<T: PartialEq>(new: Option<T>, old: Option<&T>) -> Option<T> {
    if new.as_ref() == old { None } else { new }
}

///the fixed choices, plus whatever the student already has if it isn't one of them
fn options_with_current(choices: &[&str], current: &str) -> Vec<String> {
    let mut options: Vec<String> = choices.iter().map(|c| (*c).to_string()).collect();
    if !current.is_empty() && !choices.iter().any(|c| *c == current) {
        options.push(current.to_string());
    }
    options
}

impl StudentForm {
    pub fn from_student(student: &Student) -> Self {
        Self {
            nombre: student.nombre.clone(),
            apellido: student.apellido.clone(),
            email: student.email.clone(),
            telefono: student.telefono.clone().unwrap_or_default(),
            fecha_nacimiento: student
                .fecha_nacimiento
                .map(|d| d.to_string())
                .unwrap_or_default(),
            curso: student.curso.clone().unwrap_or_default(),
            nivel: student.nivel.clone().unwrap_or_default(),
        }
    }

    pub fn to_create(&self) -> AlumnosResult<StudentCreate> {
        Ok(StudentCreate {
            nombre: self.nombre.clone(),
            apellido: self.apellido.clone(),
            email: self.email.clone(),
            telefono: non_empty(&self.telefono),
            fecha_nacimiento: parse_date(&self.fecha_nacimiento)?,
            curso: non_empty(&self.curso),
            nivel: non_empty(&self.nivel),
        })
    }

    ///patch with only the fields whose (normalised) value differs from `original`
    ///
    ///an emptied optional field normalises to absent, and absent means "leave alone",
    ///so clearing a field that had a value produces no entry
    pub fn diff(&self, original: &Student) -> AlumnosResult<StudentUpdate> {
        Ok(StudentUpdate {
            nombre: changed(non_empty(&self.nombre), Some(&original.nombre)),
            apellido: changed(non_empty(&self.apellido), Some(&original.apellido)),
            email: changed(non_empty(&self.email), Some(&original.email)),
            telefono: changed(non_empty(&self.telefono), original.telefono.as_ref()),
            fecha_nacimiento: changed(
                parse_date(&self.fecha_nacimiento)?,
                original.fecha_nacimiento.as_ref(),
            ),
            curso: changed(non_empty(&self.curso), original.curso.as_ref()),
            nivel: changed(non_empty(&self.nivel), original.nivel.as_ref()),
        })
    }

    ///creates when there's no `original`, patches otherwise
    ///
    ///the form itself is never cleared here: on success the response closes the modal, and the
    ///next "Nuevo alumno" renders a blank one
    pub async fn submit(
        &self,
        api: &AlumnosApi,
        original: Option<&Student>,
    ) -> AlumnosResult<Student> {
        if let Some(original) = original {
            let patch = self.diff(original)?;
            if patch.is_empty() {
                debug!(id = original.id, "Submitting an empty patch");
            }
            return api.update(original.id, &patch).await;
        }

        api.create(&self.to_create()?).await
    }

    pub fn render(&self, editing: Option<i32>) -> Markup {
        let courses = options_with_current(&COURSES, &self.curso);
        let levels = options_with_current(&LEVELS, &self.nivel);

        let fields = html! {
            (simple_form_element("nombre", "Nombre", true, None, Some(self.nombre.as_str())))
            (simple_form_element("apellido", "Apellido", true, None, Some(self.apellido.as_str())))
            (simple_form_element("email", "Email", true, Some("email"), Some(self.email.as_str())))
            (simple_form_element("telefono", "Teléfono", false, Some("tel"), Some(self.telefono.as_str())))
            (simple_form_element("fecha_nacimiento", "Fecha de nacimiento", false, Some("date"), Some(self.fecha_nacimiento.as_str())))
            (select_element("curso", "Curso", "Sin curso", courses.iter().map(|c| (c.as_str(), c.as_str())), &self.curso))
            (select_element("nivel", "Nivel", "Sin nivel", levels.iter().map(|l| (l.as_str(), l.as_str())), &self.nivel))
        };

        match editing {
            Some(id) => html! {
                (title("Editar alumno"))
                form hx-post={"/internal/students/" (id)} hx-target="#toasts" hx-swap="beforeend" hx-disabled-elt="find button[type='submit']" class="p-4" {
                    (fields)
                    (form_submit_button("Guardar cambios", "Guardando..."))
                }
            },
            None => html! {
                (title("Nuevo alumno"))
                form hx-put="/internal/students" hx-target="#toasts" hx-swap="beforeend" hx-disabled-elt="find button[type='submit']" class="p-4" {
                    (fields)
                    (form_submit_button("Registrar alumno", "Registrando..."))
                }
            },
        }
    }
}

pub async fn internal_get_new_student_form() -> Markup {
    modal(StudentForm::default().render(None))
}

pub async fn internal_get_edit_student_form(
    State(state): State<AlumnosState>,
    ClientDashboard(dashboard): ClientDashboard,
    Path(id): Path<i32>,
) -> AlumnosResult<Markup> {
    let student = find_student(&dashboard, state.api(), id).await?;

    Ok(modal(StudentForm::from_student(&student).render(Some(id))))
}

pub async fn internal_put_new_student(
    State(state): State<AlumnosState>,
    ClientDashboard(dashboard): ClientDashboard,
    Form(form): Form<StudentForm>,
) -> Response {
    let api = state.api();

    match form.submit(api, None).await {
        Ok(student) => {
            info!(id = student.id, "Created student");
            let message = format!("{} se ha registrado correctamente", student.full_name());
            reconcile_mutation(
                &dashboard,
                StudentEvent::Created(student),
                api,
                Toast::success(message),
            )
            .await
        }
        Err(e) => {
            warn!(?e, "Unable to create student");
            toast_only(&Toast::error(e.to_string()))
        }
    }
}

pub async fn internal_post_edit_student(
    State(state): State<AlumnosState>,
    ClientDashboard(dashboard): ClientDashboard,
    Path(id): Path<i32>,
    Form(form): Form<StudentForm>,
) -> AlumnosResult<Response> {
    let api = state.api();
    let original = find_student(&dashboard, api, id).await?;

    Ok(match form.submit(api, Some(&original)).await {
        Ok(student) => {
            info!(id, "Updated student");
            reconcile_mutation(
                &dashboard,
                StudentEvent::Updated(student),
                api,
                Toast::success("Alumno actualizado correctamente"),
            )
            .await
        }
        Err(e) => {
            warn!(?e, id, "Unable to update student");
            toast_only(&Toast::error(e.to_string()))
        }
    })
}
