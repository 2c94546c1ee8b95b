//! Authentication and profile endpoints (`auth/` service).

mod follow;

use reqwest::multipart::Form;
use reqwest::Method;
use store::models::{
    Acknowledgement, Credentials, PasswordChange, Profile, ProfileDetails, ProfileUpdate,
    SignUpForm, SignUpReceipt, TokenPair, Upload,
};
use store::{Service, TokenStorage};

use crate::client::{file_part, ApiClient, Auth};
use crate::error::{ApiError, FieldErrors};

impl<S: TokenStorage> ApiClient<S> {
    /// Exchange credentials for a token pair and persist it as the session.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let body = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let req = self
            .request(Method::POST, Service::Auth, "signin/", Auth::Anonymous)
            .json(&body);
        let tokens: TokenPair = self.send(req, "Something went wrong").await?;

        self.session()
            .set_session(tokens.clone())
            .await
            .map_err(|e| ApiError::Session(e.to_string()))?;
        tracing::info!(username, "signed in");
        Ok(tokens)
    }

    /// Register a new account. The profile travels as a JSON string field.
    pub async fn sign_up(&self, form: SignUpForm) -> Result<SignUpReceipt, ApiError> {
        let profile = serde_json::to_string(&form.profile)
            .map_err(|_| ApiError::Message("Invalid profile data".to_string()))?;
        let mut multipart = Form::new()
            .text("username", form.username)
            .text("email", form.email)
            .text("password", form.password)
            .text("confirm_password", form.confirm_password)
            .text("profile", profile);
        if let Some(image) = form.profile_image {
            multipart = multipart.part("profile_image", file_part(image)?);
        }

        let req = self
            .request(Method::POST, Service::Auth, "signup/", Auth::Anonymous)
            .multipart(multipart);
        self.send(req, "Something went wrong").await
    }

    /// Drop the local session. The backend keeps no server-side session.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session()
            .clear_session()
            .await
            .map_err(|e| ApiError::Session(e.to_string()))
    }

    pub async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        let req = self.request(Method::GET, Service::Auth, "profile/", Auth::Required);
        self.send(req, "Failed to fetch profile").await
    }

    /// Update profile details. Blank required fields fail locally without a
    /// request. Rejected with a remaining-days payload while the update
    /// cooldown is running.
    pub async fn update_profile_details(
        &self,
        details: &ProfileDetails,
    ) -> Result<ProfileUpdate, ApiError> {
        let missing = details.missing_fields();
        if !missing.is_empty() {
            return Err(ApiError::Validation(FieldErrors::required(missing)));
        }
        let req = self
            .request(Method::PATCH, Service::Auth, "profile/details/", Auth::Required)
            .json(details);
        self.send(req, "Failed to update profile").await
    }

    pub async fn update_profile_image(&self, image: Upload) -> Result<ProfileUpdate, ApiError> {
        let form = Form::new().part("profile_image", file_part(image)?);
        let req = self
            .request(Method::PATCH, Service::Auth, "profile/image/", Auth::Required)
            .multipart(form);
        self.send(req, "Something went wrong").await
    }

    /// Change the password. Rejected with a remaining-days payload while the
    /// password cooldown is running.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<Acknowledgement, ApiError> {
        let req = self
            .request(Method::POST, Service::Auth, "change-password/", Auth::Required)
            .json(change);
        self.send(req, "Failed to change password").await
    }
}
