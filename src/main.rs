use std::process::ExitCode;
use tracing::error;

#[actix_web::main]
async fn main() -> ExitCode {
    careercoach_lib::init_tracing();

    match careercoach_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "CareerCoach backend failed to start");
            ExitCode::FAILURE
        }
    }
}
