use maud::{Markup, Render, html};

const INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn subtitle(s: impl Render) -> Markup {
    html! {
        h2 class="text-xl font-semibold mb-2 text-gray-300" {(s)}
    }
}

pub fn form_element(id: &'static str, label: &'static str, element: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (element)
        }
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    required: bool,
    input_type: Option<&'static str>,
    value: Option<&str>,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            input required[required] type=(input_type.unwrap_or("text")) id=(id) name=(id) value=[value] class=(INPUT_CLASSES) {}
        },
    )
}

///`<select>` whose first option is an empty "any"/"none" choice
pub fn select_element<'a>(
    id: &'static str,
    label: &'static str,
    empty_label: &'static str,
    options: impl IntoIterator<Item = (&'a str, &'a str)>,
    selected: &str,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            select id=(id) name=(id) class=(INPUT_CLASSES) {
                option value="" selected[selected.is_empty()] {(empty_label)}
                @for (value, text) in options {
                    option value=(value) selected[value == selected] {(text)}
                }
            }
        },
    )
}

///submit button that relabels itself while htmx has the request in flight
pub fn form_submit_button(idle: &'static str, busy: &'static str) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" class="bg-blue-500 hover:bg-blue-700 disabled:opacity-50 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                span class="when-idle" {(idle)}
                span class="when-busy" {(busy)}
            }
        }
    }
}

pub fn modal(content: Markup) -> Markup {
    html! {
        div class="fixed inset-0 bg-black/60 flex items-center justify-center z-40" {
            div class="bg-gray-800 p-8 rounded shadow-md max-w-lg w-full relative" {
                button type="button" class="absolute top-2 right-4 text-gray-400 hover:text-white text-xl" "hx-on:click"="document.getElementById('modal').innerHTML = ''" {"×"}
                (content)
            }
        }
    }
}

///empties `#modal` from any response
pub fn close_modal() -> Markup {
    html! {
        div id="modal" hx-swap-oob="true" {}
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    kind: ToastKind,
    message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    ///same toast, but delivered out-of-band into `#toasts` from a response aimed elsewhere
    pub fn out_of_band(&self) -> Markup {
        html! {
            div hx-swap-oob="beforeend:#toasts" {
                (self)
            }
        }
    }
}

impl Render for Toast {
    fn render(&self) -> Markup {
        let (classes, heading) = match self.kind {
            ToastKind::Success => ("bg-green-100 border-green-400 text-green-800", "Hecho"),
            ToastKind::Error => ("bg-red-100 border-red-400 text-red-700", "Error"),
        };

        html! {
            div class={"border px-4 py-3 rounded shadow-md mb-2 " (classes)} role="alert" "hx-on::load"="setTimeout(() => this.remove(), 5000)" {
                strong class="font-bold mr-2" {(heading)}
                span {(self.message)}
            }
        }
    }
}
