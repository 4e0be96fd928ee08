use std::{
    fmt,
    io::{self, BufRead, Write},
};

use clap::{App, Arg, ArgMatches};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use tracing_subscriber::EnvFilter;

use subduel::board::{Coordinate, BOARD_SIZE};
use subduel::flow::{ConfirmOutcome, Engine, FlowError, Phase};
use subduel::state::PlayerId;
use subduel::view::Control;

use self::mock::MockServer;

mod mock;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let matches = App::new("Subduel")
        .version("0.1")
        .about("Submarine duel against a local mock opponent.")
        .arg(
            Arg::with_name("name")
                .short("n")
                .long("name")
                .value_name("NAME")
                .help("player id to render for")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("first_player")
                .short("f")
                .long("first_player")
                .value_name("FIRST_PLAYER")
                .help("pre-specify which player goes first")
                .takes_value(true)
                .possible_values(&["human", "me", "computer", "bot", "random", "rand"])
                .case_insensitive(true),
        )
        .get_matches();

    let stdin = std::io::stdin();
    let mut input = InputReader::new(stdin.lock());
    let mut rng = rand::thread_rng();

    let viewer = PlayerId::from(matches.value_of("name").unwrap_or("playerA"));
    let bot = PlayerId::from("computer");
    let human_first = choose_first(&matches, &mut input, &mut rng)?;

    let (first, second) = if human_first {
        (viewer.clone(), bot.clone())
    } else {
        (bot.clone(), viewer.clone())
    };
    let server = MockServer::new(&mut rng, first, second);
    let mut engine = Engine::new(viewer.clone(), server);

    println!("Type help or ? for commands. Rows are letters A-E, columns 1-5.");
    loop {
        let view = engine.submitter().state_for(&viewer);
        engine.sync(&view);

        if let Some(winner) = engine.submitter().winner() {
            let winner = winner.clone();
            show_log(engine.submitter());
            if winner == viewer {
                println!("All enemy submarines are sunk. You win!");
            } else {
                println!("Your fleet is sunk. {} wins.", winner);
            }
            return Ok(());
        }

        if engine.phase() == Phase::OpponentTurn {
            println!();
            println!("Opponent's turn...");
            let bot = bot.clone();
            engine.submitter_mut().opponent_act(&mut rng, &bot);
            continue;
        }

        println!();
        show_board(&engine, &viewer);
        if !run_turn_command(&mut engine, &mut input)? {
            return Ok(());
        }
    }
}

/// Choose who goes first from either args or cli input.
fn choose_first<B: BufRead>(
    matches: &ArgMatches,
    input: &mut InputReader<B>,
    rng: &mut impl Rng,
) -> io::Result<bool> {
    Ok(if let Some(clichoice) = matches.value_of("first_player") {
        match clichoice {
            "human" | "me" => true,
            "computer" | "bot" => false,
            "random" | "rand" => rng.gen(),
            _ => unreachable!(),
        }
    } else {
        input.read_input_lower("Do you want to go first? (Y/n)", |input| match input {
            "yes" | "y" | "first" | "1" | "1st" | "" => Some(true),
            "no" | "n" | "second" | "2" | "2nd" => Some(false),
            _ => {
                println!("Invalid selection.");
                None
            }
        })?
    })
}

/// Read and apply one command. Returns false when the player quits.
fn run_turn_command<B: BufRead>(
    engine: &mut Engine<MockServer>,
    input: &mut InputReader<B>,
) -> io::Result<bool> {
    enum Command {
        Attack,
        Move,
        Pick(Coordinate),
        Confirm,
        Back,
        Log,
        Help,
        Quit,
    }

    // Matches `pick 3,2`, `pick 3 b` and `pick 3b`.
    static PICK: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?x)(?:pick|select|sel)\s+
        (?P<x>[0-9]+)(?:\s*,\s*|\s*)
        (?P<y>[0-9a-e])$",
        )
        .unwrap()
    });

    let controls = engine.controls();
    let cmd = input.read_input_lower(&format!("{} >", phase_name(engine.phase())), |line| {
        match line {
            "?" | "help" | "h" => Some(Command::Help),
            "attack" | "a" => Some(Command::Attack),
            "move" | "m" => Some(Command::Move),
            "confirm" | "ok" | "apply" => Some(Command::Confirm),
            "back" | "b" => Some(Command::Back),
            "log" | "show" => Some(Command::Log),
            "quit" | "q" | "exit" => Some(Command::Quit),
            other => {
                if let Some(captures) = PICK.captures(other) {
                    let x: usize = match captures.name("x").unwrap().as_str().parse() {
                        Ok(x) if x >= 1 && x <= BOARD_SIZE => x,
                        _ => {
                            println!("column must be in range [1,{}]", BOARD_SIZE);
                            return None;
                        }
                    };
                    let y = match row_number(captures.name("y").unwrap().as_str()) {
                        Some(y) => y,
                        None => {
                            println!("row must be a letter A-E or a number in [1,{}]", BOARD_SIZE);
                            return None;
                        }
                    };
                    Some(Command::Pick(Coordinate::new(x, y)))
                } else {
                    println!("Invalid command \"{}\". Use '?' for help", other);
                    None
                }
            }
        }
    })?;

    match cmd {
        Command::Attack if controls.contains(Control::Attack) => {
            engine.start_attack();
            println!("Select the attacking submarine.");
        }
        Command::Move if controls.contains(Control::Move) => {
            engine.start_move();
            println!("Select the submarine to move.");
        }
        Command::Attack | Command::Move => {
            println!("You cannot start another action right now.");
        }
        Command::Pick(cell) => {
            if !engine.select_cell(cell) {
                println!("That cell is not selectable right now.");
            }
        }
        Command::Confirm if controls.contains(Control::Confirm) => match engine.confirm() {
            Ok(ConfirmOutcome::CandidatesReady) => {
                println!("Now select one of the marked cells.");
            }
            Ok(ConfirmOutcome::Submitted) => {
                println!("Action accepted.");
            }
            Ok(ConfirmOutcome::Ignored) => {
                println!("Nothing selected yet.");
            }
            Err(FlowError::Submission(err)) => {
                println!("The server rejected that action: {}. Adjust and retry.", err);
            }
            Err(err) => {
                println!("Could not submit: {}", err);
            }
        },
        Command::Confirm => {
            println!("Nothing to confirm right now.");
        }
        Command::Back if controls.contains(Control::Back) => {
            engine.back();
        }
        Command::Back => {
            println!("Nothing to go back from.");
        }
        Command::Log => show_log(engine.submitter()),
        Command::Help => {
            println!(
                "Available Commands:
    attack                     start the attack flow.
    move                       start the move flow.
    pick <col><row>            select a cell, e.g. \"pick 3B\" or \"pick 3,2\".
    confirm                    confirm the current selection.
    back                       step back one stage, or cancel the flow.
    log                        print the action log.
    quit                       leave the game.",
            );
        }
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::SelectActor => "attacker",
        Phase::SelectTarget => "target",
        Phase::SelectSource => "submarine",
        Phase::SelectDestination => "destination",
        Phase::Submitting => "submitting",
        Phase::OpponentTurn => "waiting",
    }
}

/// Row letter for a 1-indexed y, after the original front end's labels.
fn row_label(y: usize) -> char {
    (b'A' + (y - 1) as u8) as char
}

/// Parse a row given as a letter (a-e) or a number (1-5).
fn row_number(label: &str) -> Option<usize> {
    let c = label.chars().next()?;
    let y = match c {
        'a'..='e' => (c as u8 - b'a') as usize + 1,
        '1'..='9' => c.to_digit(10).unwrap() as usize,
        _ => return None,
    };
    if y >= 1 && y <= BOARD_SIZE {
        Some(y)
    } else {
        None
    }
}

/// Print the board with highlight markers: `*` marks clickable cells, `[..]`
/// the selected ones.
fn show_board(engine: &Engine<MockServer>, viewer: &PlayerId) {
    enum Mark {
        None,
        Clickable,
        Selected,
    }
    struct BoardCell {
        text: String,
        mark: Mark,
    }
    impl fmt::Display for BoardCell {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self.mark {
                Mark::None => f.pad(&self.text),
                Mark::Clickable => f.pad(&format!("{}*", self.text)),
                Mark::Selected => f.pad(&format!("[{}]", self.text)),
            }
        }
    }

    let highlights = engine.highlights();
    let mark_of = |cell: Coordinate| {
        if highlights.selected_actor == Some(cell) || highlights.selected_target == Some(cell) {
            Mark::Selected
        } else if highlights.clickable.contains(&cell) {
            Mark::Clickable
        } else {
            Mark::None
        }
    };

    print!("   ");
    for x in 1..=BOARD_SIZE {
        print!("{:^5}", x);
    }
    println!();
    for y in 1..=BOARD_SIZE {
        print!("{:>2} ", row_label(y));
        for x in 1..=BOARD_SIZE {
            let cell = Coordinate::new(x, y);
            let text = engine
                .submitter()
                .cells()
                .find(|(position, ..)| *position == cell)
                .map(|(_, owner, hp, sunk)| {
                    let tag = if owner == viewer { 'S' } else { 'e' };
                    if sunk {
                        format!("{}x", tag)
                    } else {
                        format!("{}{}", tag, hp)
                    }
                })
                .unwrap_or_else(|| "~".to_owned());
            print!(
                "{:^5}",
                BoardCell {
                    text,
                    mark: mark_of(cell)
                }
            );
        }
        println!();
    }
    let _ = io::stdout().flush();
}

/// Print the action log, newest first, the way the original front end
/// rendered its log list.
fn show_log(server: &MockServer) {
    println!("Action log:");
    if server.log().is_empty() {
        println!("  (no actions yet)");
        return;
    }
    for line in server.log().iter().rev() {
        println!("  {}", line);
    }
}

/// Helper to read input from the player.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Repeatedly tries to read input until the input checker returns `Some`.
    /// Converts to ascii lower before running the checker.
    fn read_input_lower<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            self.buf.make_ascii_lowercase();
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Helper to print the prompt, clear the string buffer and read a line.
    fn read_input_inner(&mut self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            println!();
            std::process::exit(0);
        }
        Ok(())
    }
}
