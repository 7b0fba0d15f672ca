use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use client_core::{load_config, BookingClient, SubmitOutcome, ViewState};

#[derive(Parser, Debug)]
struct Args {
    /// Override the backend base URL from booking.toml / environment.
    #[arg(long)]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut config = load_config();
    if let Some(backend_url) = args.backend_url {
        config.backend_url = backend_url.trim_end_matches('/').to_string();
    }

    let client = BookingClient::new(config);
    print_help();
    render(&client).await;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let (command, rest) = match line.trim().split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "" => {}
            "name" => client.set_name(rest).await,
            "roll" => client.set_roll_number(rest).await,
            "email" => client.set_email(rest).await,
            "utr" => client.set_utr(rest).await,
            "rosemilk" => client.set_rosemilk(rest.eq_ignore_ascii_case("on")).await,
            "payee" => client.cycle_payee().await,
            "submit" => match client.submit().await {
                Ok(SubmitOutcome::Submitted) => {}
                Ok(SubmitOutcome::Ignored) => {
                    println!("A submission is already in flight; hold on.");
                }
                // The error also lands in the form's error slot, which the
                // render below surfaces.
                Err(_) => {}
            },
            "more" => client.book_more().await,
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("Unknown command '{other}' (try 'help')."),
        }

        render(&client).await;
    }

    Ok(())
}

fn print_help() {
    println!("Snack booking commands:");
    println!("  name <value>     set the student name (max 20 chars)");
    println!("  roll <value>     set the roll number (exactly 7 chars)");
    println!("  email <value>    set the email the coupon is sent to");
    println!("  utr <value>      set the 12-digit payment transaction ID");
    println!("  rosemilk on|off  include or drop the rosemilk add-on");
    println!("  payee            switch to the next payment recipient");
    println!("  submit           validate and send the registration");
    println!("  more             book another coupon after a success");
    println!("  quit             leave");
}

async fn render(client: &BookingClient) {
    let snapshot = client.snapshot().await;

    if snapshot.view == ViewState::Success {
        println!();
        println!("Success! Coupon sent to {}.", snapshot.fields.email);
        println!("Type 'more' to book another.");
        print_prompt();
        return;
    }

    println!();
    println!(
        "Pay Rs.{} to {} ({})",
        snapshot.amount, snapshot.payee.name, snapshot.payee.vpa
    );
    println!("  UPI link: {}", snapshot.payment_uri);
    println!("  QR image: {}", snapshot.qr_image_url);
    println!(
        "Form: name='{}' roll='{}' email='{}' utr='{}' rosemilk={}",
        snapshot.fields.name,
        snapshot.fields.roll_number,
        snapshot.fields.email,
        snapshot.fields.utr,
        if snapshot.selection.has_rosemilk() {
            "on"
        } else {
            "off"
        }
    );
    if let Some(error) = &snapshot.error_message {
        println!("  !! {error}");
    }
    print_prompt();
}

fn print_prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}
