use garde::Validate;
use std::path::PathBuf;

/// The person on whose behalf applications are filled in.
#[derive(Debug, Clone, Validate)]
pub struct ApplicantProfile {
    #[garde(length(min = 1, max = 200))]
    pub name: String,

    #[garde(email)]
    pub email: String,

    /// Local path handed to the form's file-upload field.
    #[garde(custom(non_empty_path))]
    pub resume_path: PathBuf,
}

fn non_empty_path(value: &PathBuf, _ctx: &()) -> garde::Result {
    if value.as_os_str().is_empty() {
        return Err(garde::Error::new("resume path is empty"));
    }
    Ok(())
}
