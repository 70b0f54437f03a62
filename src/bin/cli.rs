use clap::Parser;
use daily_schedule::overlap::conflicting_pairs;
use daily_schedule::{
    AppConfig, Category, CliArgs, ClockTime, STATUS_COMPLETED, STATUS_IN_PROGRESS, Schedule,
    ScheduleStore, Task, TaskId, format_duration, init_logging, load_or_seed, load_schedule_from_csv,
    load_schedule_from_json, load_schedule_from_markdown, open_store, save_schedule,
    save_schedule_to_csv, save_schedule_to_json, save_schedule_to_markdown,
};
use std::fs;
use std::io::{self, Write};

fn render_task_table(schedule: &Schedule) -> String {
    let overlapping = schedule.overlaps().overlapping_ids;
    let headers = ["#", "time", "name", "category", "status", "!"];
    let rows: Vec<[String; 6]> = schedule
        .tasks()
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            [
                (idx + 1).to_string(),
                format!("{}-{}", task.start_time, task.end_time),
                task.name.clone(),
                task.category_name.clone(),
                task.status.clone(),
                if overlapping.contains(&task.id) {
                    "!".to_string()
                } else {
                    String::new()
                },
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[&str]| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            let pad = widths[ci].saturating_sub(cell.chars().count());
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_row(&cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show tasks (! marks a conflict)\n  markdown                           Print the schedule document\n  add <HH:MM-HH:MM> <name> | <category>\n                                     Add a task\n  delete <n>                         Delete task number n\n  status <n> <text...>               Set the status of task n\n  done <n>                           Toggle task n completed or in progress\n  cats                               List categories\n  cat <name...> <#RRGGBB>            Add or recolor a category\n  uncat <name...>                    Remove a category\n  conflicts                          List overlapping tasks\n  stats                              Show day statistics\n  now                                Show the current and next task\n  import <path>                      Replace the schedule with a Markdown file\n  save <md|json|csv> <path>          Export the schedule\n  load <md|json|csv> <path>          Replace the schedule from an export\n  quit|exit                          Exit"
    );
}

fn task_id_at(schedule: &Schedule, arg: &str) -> Result<TaskId, String> {
    let position: usize = arg
        .parse()
        .map_err(|_| format!("Invalid task number '{arg}'"))?;
    position
        .checked_sub(1)
        .and_then(|idx| schedule.tasks().get(idx))
        .map(|task| task.id.clone())
        .ok_or_else(|| format!("No task number {position}"))
}

fn parse_new_task(rest: &str) -> Result<Task, String> {
    const USAGE: &str = "Usage: add <HH:MM-HH:MM> <name> | <category>";
    let (range, remainder) = rest.split_once(char::is_whitespace).ok_or(USAGE)?;
    let (start, end) = range.split_once('-').ok_or(USAGE)?;
    let start: ClockTime = start.parse().map_err(|e| format!("{e}"))?;
    let end: ClockTime = end.parse().map_err(|e| format!("{e}"))?;
    let (name, category) = remainder.split_once('|').ok_or(USAGE)?;
    Ok(Task::new(name.trim(), start, end, category.trim()))
}

fn print_categories(schedule: &Schedule) {
    if schedule.categories().is_empty() {
        println!("No categories.");
    }
    for category in schedule.categories() {
        println!("  {} {}", category.color, category.name);
    }
}

fn print_conflicts(schedule: &Schedule) {
    let pairs = conflicting_pairs(schedule.tasks());
    for (a, b) in &pairs {
        println!(
            "  {}-{} {}  <->  {}-{} {}",
            a.start_time, a.end_time, a.name, b.start_time, b.end_time, b.name
        );
    }
    println!("Conflicts: {}", schedule.overlaps().conflict_count);
}

fn print_stats(schedule: &Schedule) {
    let stats = schedule.day_stats();
    println!("Scheduled          : {}", format_duration(stats.total_minutes));
    println!("Day filled         : {}%", stats.fill_percentage);
    println!("Conflicts          : {}", stats.conflict_count);
    for entry in &stats.categories {
        let color = schedule
            .category_color(&entry.category_name)
            .unwrap_or("#888888");
        println!(
            "  {} {:<24} {}",
            color,
            entry.category_name,
            format_duration(entry.minutes)
        );
    }
}

fn print_agenda(schedule: &Schedule, config: &AppConfig) {
    let now = config.now();
    let agenda = schedule.agenda_at(now);
    println!("Now {now} ({})", config.timezone);
    match &agenda.current {
        Some(active) => println!(
            "  Current: {} ({} left)",
            active.task.name,
            format_duration(active.minutes_remaining)
        ),
        None => println!("  Current: nothing scheduled"),
    }
    if let Some(next) = &agenda.next {
        println!(
            "  Next   : {} at {} (in {})",
            next.task.name,
            next.task.start_time,
            format_duration(next.minutes_until)
        );
    }
}

fn persist(store: &dyn ScheduleStore, schedule: &Schedule) {
    if let Err(e) = save_schedule(store, schedule) {
        println!("Warning: schedule not saved: {e}");
    }
}

fn main() {
    let cli = CliArgs::parse();
    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = init_logging(&config.log_level) {
        eprintln!("{e}");
    }

    let store = match open_store(&config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening schedule store: {e}");
            std::process::exit(1);
        }
    };
    let mut schedule = match load_or_seed(store.as_ref()) {
        Ok(schedule) => schedule,
        Err(e) => {
            println!("Could not load or seed the stored schedule ({e}); using the default.");
            Schedule::new()
        }
    };

    println!("Daily Schedule (CLI) - type 'help' for commands\n");
    println!("{}", render_task_table(&schedule));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (cmd, rest) = input
            .split_once(char::is_whitespace)
            .map(|(cmd, rest)| (cmd, rest.trim()))
            .unwrap_or((input, ""));

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => println!("{}", render_task_table(&schedule)),
            "markdown" => println!("{}", schedule.markdown()),
            "add" => match parse_new_task(rest) {
                Ok(task) => match schedule.add_task(task) {
                    Ok(_) => {
                        persist(store.as_ref(), &schedule);
                        println!("Task added.");
                        println!("{}", render_task_table(&schedule));
                    }
                    Err(e) => println!("Error: {e}"),
                },
                Err(e) => println!("{e}"),
            },
            "delete" => match task_id_at(&schedule, rest) {
                Ok(id) => {
                    schedule.delete_task(&id);
                    persist(store.as_ref(), &schedule);
                    println!("Deleted task {rest}.");
                    println!("{}", render_task_table(&schedule));
                }
                Err(e) => println!("{e}"),
            },
            "status" | "done" => {
                let (index, text) = if cmd == "done" {
                    (rest, None)
                } else {
                    match rest.split_once(char::is_whitespace) {
                        Some((index, text)) => (index, Some(text.trim())),
                        None => {
                            println!("Usage: status <n> <text...>");
                            continue;
                        }
                    }
                };
                let updated = task_id_at(&schedule, index).and_then(|id| {
                    let task = schedule
                        .find_task(&id)
                        .cloned()
                        .ok_or_else(|| format!("Task {id} not found"))?;
                    let status = text.unwrap_or(if task.is_completed() {
                        STATUS_IN_PROGRESS
                    } else {
                        STATUS_COMPLETED
                    });
                    schedule
                        .update_task(task.with_status(status))
                        .map_err(|e| format!("Error: {e}"))
                });
                match updated {
                    Ok(()) => {
                        persist(store.as_ref(), &schedule);
                        println!("Status set.");
                        println!("{}", render_task_table(&schedule));
                    }
                    Err(e) => println!("{e}"),
                }
            }
            "cats" => print_categories(&schedule),
            "cat" => match rest.rsplit_once(char::is_whitespace) {
                Some((name, color)) => {
                    match schedule.upsert_category(Category::new(name.trim(), color.trim())) {
                        Ok(()) => {
                            persist(store.as_ref(), &schedule);
                            println!("Category saved.");
                            print_categories(&schedule);
                        }
                        Err(e) => println!("Error: {e}"),
                    }
                }
                None => println!("Usage: cat <name...> <#RRGGBB>"),
            },
            "uncat" => {
                if schedule.remove_category(rest) {
                    persist(store.as_ref(), &schedule);
                    println!("Category removed.");
                } else {
                    println!("Category '{rest}' not found.");
                }
            }
            "conflicts" => print_conflicts(&schedule),
            "stats" => print_stats(&schedule),
            "now" => print_agenda(&schedule, &config),
            "import" => match fs::read_to_string(rest) {
                Ok(text) => {
                    schedule.import_markdown(&text);
                    persist(store.as_ref(), &schedule);
                    println!("Schedule imported from {rest}");
                    println!("{}", render_task_table(&schedule));
                }
                Err(e) => println!("Error reading {rest}: {e}"),
            },
            "save" | "load" => {
                let Some((format, path)) = rest.split_once(char::is_whitespace) else {
                    println!("Usage: {cmd} <md|json|csv> <path>");
                    continue;
                };
                let path = path.trim();
                if cmd == "save" {
                    let result = match format {
                        "md" => save_schedule_to_markdown(&schedule, path),
                        "json" => save_schedule_to_json(&schedule, path),
                        "csv" => save_schedule_to_csv(&schedule, path),
                        _ => {
                            println!("Unknown format '{format}' (md|json|csv)");
                            continue;
                        }
                    };
                    match result {
                        Ok(()) => println!("Schedule saved to {path}"),
                        Err(e) => println!("Save error: {e}"),
                    }
                } else {
                    let result = match format {
                        "md" => load_schedule_from_markdown(path),
                        "json" => load_schedule_from_json(path),
                        "csv" => load_schedule_from_csv(path),
                        _ => {
                            println!("Unknown format '{format}' (md|json|csv)");
                            continue;
                        }
                    };
                    match result {
                        Ok(loaded) => {
                            schedule = loaded;
                            persist(store.as_ref(), &schedule);
                            println!("Schedule loaded from {path}");
                            println!("{}", render_task_table(&schedule));
                        }
                        Err(e) => println!("Load error: {e}"),
                    }
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
