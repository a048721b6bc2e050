//! When steps for signup BDD scenarios.

use super::world::{SignupWorld, run_async};
use registrar::user::services::{GetUserRequest, SignUpRequest};
use rstest_bdd_macros::when;

#[when(
    r#""{address}" signs up as "{user_name}" with email "{email}" named "{first_name}" "{last_name}""#
)]
fn signs_up(
    world: &mut SignupWorld,
    address: String,
    user_name: String,
    email: String,
    first_name: String,
    last_name: String,
) -> Result<(), eyre::Report> {
    let request = SignUpRequest::new(address, user_name, email, first_name, last_name);
    let client = world.client()?;
    let result = run_async(client.sign_up(&request));
    world.last_result = Some(result);
    Ok(())
}

#[when(r#"the user with address "{address}" is looked up"#)]
fn looked_up(world: &mut SignupWorld, address: String) -> Result<(), eyre::Report> {
    let client = world.client()?;
    let result = run_async(client.get_user(&GetUserRequest::new(address)));
    world.last_result = Some(result);
    Ok(())
}
