use clap::Args;
use jiff::Timestamp;
use storefront_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Access password
    #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn login(context: &AppContext, args: LoginArgs) -> Result<(), String> {
    if !context.access.is_gated() {
        println!("no access gate is configured; the storefront is open");
        return Ok(());
    }

    let grant = context
        .access
        .login(&args.password, Timestamp::now())
        .await
        .map_err(|error| format!("login failed: {error}"))?;

    println!("access granted until {}", grant.expiry);

    Ok(())
}

pub(crate) fn logout(context: &AppContext) -> Result<(), String> {
    context
        .access
        .logout()
        .map_err(|error| format!("logout failed: {error}"))?;

    println!("logged out");

    Ok(())
}
