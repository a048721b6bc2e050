//! Given steps for signup BDD scenarios.

use super::world::{SignupWorld, request_for, run_async, start_service};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given("the registrar service is running")]
fn service_running(world: &mut SignupWorld) -> Result<(), eyre::Report> {
    let (client, shutdown) = run_async(start_service()).wrap_err("start registrar service")?;
    world.client = Some(client);
    world.shutdown = Some(shutdown);
    Ok(())
}

#[given(r#"a user with address "{address}" has signed up"#)]
fn user_signed_up(world: &mut SignupWorld, address: String) -> Result<(), eyre::Report> {
    let request = request_for(&address);
    let client = world.client()?;
    let created = run_async(client.sign_up(&request)).wrap_err("sign up existing user")?;
    world.signed_up = Some(created);
    Ok(())
}
