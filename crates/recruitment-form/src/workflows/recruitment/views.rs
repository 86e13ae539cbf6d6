//! Read-only view model of the form, shaped for a renderer (HTML template, JSON client).

use serde::Serialize;

use super::domain::{Country, FieldName, Photo, PhotoSlot};
use super::photos::PhotoPolicy;
use super::regions::{AddressPlaceholders, RegionInput};
use super::state::FormState;

const TITLE: &str = "Formularz rekrutacyjny";
const DESCRIPTION: &str =
    "Żeby aplikować na to stanowisko, prosimy o wypełnienie poniższego formularza.";
const SUBMIT_LABEL: &str = "Wyślij formularz";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputView {
    Text { disabled: bool },
    Select { options: Vec<OptionView> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub placeholder: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub input: InputView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub name: &'static str,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoStatus {
    Empty,
    Valid,
    Invalid,
}

impl PhotoStatus {
    pub fn of(photo: &Photo) -> Self {
        if photo.is_valid {
            PhotoStatus::Valid
        } else if photo.visible_error().is_some() {
            PhotoStatus::Invalid
        } else {
            PhotoStatus::Empty
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoWidgetView {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub accept: String,
    pub hints: Vec<String>,
    pub status: PhotoStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitButtonView {
    pub label: &'static str,
    pub disabled: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub title: &'static str,
    pub description: &'static str,
    pub sections: Vec<SectionView>,
    pub photos: Vec<PhotoWidgetView>,
    pub submit: SubmitButtonView,
}

impl FormView {
    pub fn render(state: &FormState, policy: &PhotoPolicy) -> Self {
        let country = state.values.country;
        let placeholders = AddressPlaceholders::for_country(country);

        let personal = SectionView {
            name: "Dane osobowe",
            fields: vec![
                text_field(state, FieldName::FirstName, "Jan"),
                text_field(state, FieldName::LastName, "Kowalski"),
                text_field(state, FieldName::DateOfBirth, "2006-12-25"),
            ],
        };

        let address = SectionView {
            name: "Adres",
            fields: vec![
                field(
                    state,
                    FieldName::Country,
                    placeholders.country,
                    InputView::Select {
                        options: Country::ALL
                            .into_iter()
                            .map(|country| OptionView {
                                value: country.code().to_string(),
                                label: country.label().to_string(),
                            })
                            .collect(),
                    },
                ),
                field(
                    state,
                    FieldName::Voivodeship,
                    placeholders.voivodeship,
                    region_input(RegionInput::for_country(country)),
                ),
                text_field(state, FieldName::City, placeholders.city),
                text_field(state, FieldName::ZipCode, placeholders.zip_code),
                text_field(state, FieldName::AddressLine1, placeholders.address_line1),
                text_field(state, FieldName::AddressLine2, placeholders.address_line2),
            ],
        };

        let photos = state
            .photos
            .iter()
            .map(|(slot, photo)| photo_widget(slot, photo, policy))
            .collect();

        Self {
            title: TITLE,
            description: DESCRIPTION,
            sections: vec![personal, address],
            photos,
            submit: SubmitButtonView {
                label: SUBMIT_LABEL,
                disabled: state.submitting,
                busy: state.submitting,
            },
        }
    }

    pub fn field(&self, name: FieldName) -> Option<&FieldView> {
        self.sections
            .iter()
            .flat_map(|section| section.fields.iter())
            .find(|field| field.name == name.key())
    }
}

fn region_input(input: RegionInput) -> InputView {
    match input {
        RegionInput::FreeText { enabled } => InputView::Text { disabled: !enabled },
        RegionInput::Enumerated(options) => InputView::Select {
            options: options
                .iter()
                .map(|state| OptionView {
                    value: state.to_string(),
                    label: state.to_string(),
                })
                .collect(),
        },
    }
}

fn text_field(state: &FormState, name: FieldName, placeholder: &'static str) -> FieldView {
    field(state, name, placeholder, InputView::Text { disabled: false })
}

fn field(
    state: &FormState,
    name: FieldName,
    placeholder: &'static str,
    input: InputView,
) -> FieldView {
    FieldView {
        name: name.key(),
        label: name.label(),
        required: name.required(),
        placeholder,
        value: state.values.value(name).to_string(),
        error: state.field_errors.get(name).map(str::to_string),
        input,
    }
}

fn photo_widget(slot: PhotoSlot, photo: &Photo, policy: &PhotoPolicy) -> PhotoWidgetView {
    PhotoWidgetView {
        name: slot.field_name(),
        label: slot.label(),
        required: true,
        accept: policy.accept_attribute(),
        hints: policy.hints(),
        status: PhotoStatus::of(photo),
        file_name: photo.file.as_ref().map(|file| file.name.clone()),
        error: photo.visible_error().map(str::to_string),
    }
}
