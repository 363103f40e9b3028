pub mod use_cases;

pub use use_cases::{
    authorize::{AuthorizeError, AuthorizeUseCase},
    forgot_password::{ForgotPasswordError, ForgotPasswordUseCase},
    login::{LoginError, LoginUseCase},
    reset_password::{ResetPasswordError, ResetPasswordUseCase},
    restrict::{ForbiddenError, restrict_to},
    signup::{SignupError, SignupUseCase},
    update_password::{UpdatePasswordError, UpdatePasswordUseCase},
};
