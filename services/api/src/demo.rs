use crate::infra::{load_selected_file, parse_country, ConsoleNotificationSink};
use clap::Args;
use recruitment_form::config::{AppConfig, FormConfig};
use recruitment_form::error::AppError;
use recruitment_form::workflows::recruitment::{
    ApplicantRecord, Country, FieldName, FormAction, FormState, FormView, ImageCrateDecoder,
    LoggingSubmissionSink, PhotoPolicy, PhotoSlot, PhotoValidator, RecruitmentForm,
    SubmitOutcome,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CheckPhotoArgs {
    /// Image file to validate (type is guessed from the extension)
    pub(crate) path: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FormViewArgs {
    /// Preselect a country (PL, DE or US)
    #[arg(long, value_parser = parse_country)]
    pub(crate) country: Option<Country>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Photo for the first slot
    #[arg(long)]
    pub(crate) first_photo: PathBuf,
    /// Photo for the second slot
    #[arg(long)]
    pub(crate) second_photo: PathBuf,
    /// Country of the sample applicant
    #[arg(long, value_parser = parse_country, default_value = "PL")]
    pub(crate) country: Country,
}

pub(crate) async fn run_check_photo(args: CheckPhotoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let policy = PhotoPolicy::default().with_max_megabytes(config.form.photo_max_mb);
    let validator = PhotoValidator::new(Arc::new(ImageCrateDecoder), policy);

    let file = load_selected_file(&args.path).await?;
    println!(
        "{} ({}, {} bytes)",
        file.name,
        file.content_type,
        file.size()
    );

    let photo = validator.validate(Some(file)).await;
    match photo.visible_error() {
        None if photo.is_valid => println!("  accepted"),
        Some(message) => println!("  rejected: {message}"),
        None => println!("  no file"),
    }
    Ok(())
}

pub(crate) fn run_form_view(args: FormViewArgs) -> Result<(), AppError> {
    let mut state = FormState::new();
    if let Some(country) = args.country {
        state = state.reduce(FormAction::CountryChanged(country));
    }

    let view = FormView::render(&state, &PhotoPolicy::default());
    let rendered = serde_json::to_string_pretty(&view).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        first_photo,
        second_photo,
        country,
    } = args;

    let config = FormConfig::default();
    let form = RecruitmentForm::new(
        Arc::new(LoggingSubmissionSink),
        Arc::new(ConsoleNotificationSink),
        Arc::new(ImageCrateDecoder),
        &config,
    );

    println!("Recruitment form demo");
    let applicant = sample_applicant(country);
    form.change_country(country);
    for field in FieldName::ALL {
        if field != FieldName::Country {
            form.change_field(field, applicant.value(field));
        }
    }
    println!(
        "- Applicant {} {} ({}, {})",
        applicant.first_name,
        applicant.last_name,
        applicant.city,
        country.label()
    );

    for (slot, path) in [(PhotoSlot::First, first_photo), (PhotoSlot::Second, second_photo)] {
        let file = load_selected_file(&path).await?;
        form.select_photo(slot, Some(file)).await;
        let state = form.snapshot();
        let photo = state.photos.get(slot);
        match photo.visible_error() {
            Some(message) => println!("- {}: {} -> {message}", slot.label(), path.display()),
            None => println!("- {}: {} -> ok", slot.label(), path.display()),
        }
    }

    match form.submit().await? {
        SubmitOutcome::Submitted => println!("Submission delivered"),
        SubmitOutcome::Rejected(rejection) => {
            println!("Submission blocked:");
            for (field, message) in rejection.field_errors.iter() {
                println!("  - {}: {message}", field.label());
            }
            for (slot, message) in &rejection.photo_errors {
                println!("  - {}: {message}", slot.label());
            }
        }
        SubmitOutcome::Failed { reason } => println!("Submission failed: {reason}"),
        SubmitOutcome::AlreadySubmitting => println!("Submission already in progress"),
    }

    Ok(())
}

fn sample_applicant(country: Country) -> ApplicantRecord {
    let (region, city, zip_code, street) = match country {
        Country::Poland => ("Mazowieckie", "Warszawa", "00-950", "ul. Marszałkowska 100"),
        Country::Germany => ("Nordrhein-Westfalen", "Köln", "50667", "Hohe Straße 52"),
        Country::UnitedStates => ("California", "San Francisco", "94105", "1600 Market St"),
    };

    ApplicantRecord {
        first_name: "Jan".to_string(),
        last_name: "Kowalski".to_string(),
        date_of_birth: "1990-05-17".to_string(),
        address_line1: street.to_string(),
        address_line2: None,
        zip_code: zip_code.to_string(),
        country: Some(country),
        voivodeship: region.to_string(),
        city: city.to_string(),
    }
}
