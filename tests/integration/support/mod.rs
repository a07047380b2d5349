pub mod intake_fixture;
