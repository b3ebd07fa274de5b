mod helpers;
mod login;
mod logout;
mod password_reset;
mod refresh;
mod signup;
