//! # Feature: Hangman
//!
//! Letter-guessing game driven by two dropdown menus (A-M and N-Z).
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Initial release with hints and gallows art

use rand::seq::IndexedRandom;
use serenity::builder::{CreateComponents, CreateEmbed};
use std::collections::BTreeSet;
use std::time::Duration;

use crate::embeds::{BLURPLE, GREEN, PURPLE, RED};
use crate::views::{Expiring, ViewTimeout};

pub const MAX_ATTEMPTS: u8 = 6;
pub const VIEW_TIMEOUT: Duration = Duration::from_secs(90);

pub const SELECT_FIRST_HALF: &str = "hangman:a-m";
pub const SELECT_SECOND_HALF: &str = "hangman:n-z";

const GALLOWS: [&str; 7] = [
    "\n +---+\n     |\n     |\n     |\n    ===\n",
    "\n +---+\n O   |\n     |\n     |\n    ===\n",
    "\n +---+\n O   |\n |   |\n     |\n    ===\n",
    "\n +---+\n O   |\n/|   |\n     |\n    ===\n",
    "\n +---+\n O   |\n/|\\  |\n     |\n    ===\n",
    "\n +---+\n O   |\n/|\\  |\n/    |\n    ===\n",
    "\n +---+\n O   |\n/|\\  |\n/ \\  |\n    ===\n",
];

/// (word, hint) pairs, grouped loosely by topic.
pub const WORDS_WITH_HINTS: &[(&str, &str)] = &[
    ("python", "A popular programming language."),
    ("javascript", "A scripting language used for web development."),
    ("algorithm", "A process or set of rules to solve problems."),
    ("debug", "To fix code errors."),
    ("function", "A reusable block of code."),
    ("variable", "A storage location in programming."),
    ("syntax", "The structure of statements in a programming language."),
    ("loop", "A sequence of instructions that repeats."),
    ("array", "A collection of items stored at contiguous memory locations."),
    ("recursion", "A function that calls itself."),
    ("compiler", "A program that translates code into machine language."),
    ("boolean", "A data type with two possible values: true or false."),
    ("discord", "A chat platform for communities."),
    ("html", "The standard markup language for web pages."),
    ("css", "A stylesheet language for designing web pages."),
    ("react", "A JavaScript library for building user interfaces."),
    ("backend", "The server-side part of a web application."),
    ("api", "A set of protocols for building software applications."),
    ("cookie", "A small piece of data stored on the user's computer."),
    ("http", "A protocol for transmitting hypertext over the internet."),
    ("hangman", "A classic word-guessing game."),
    ("minecraft", "A sandbox video game with blocks."),
    ("chess", "A strategic board game for two players."),
    ("pixel", "The smallest unit of a digital image."),
    ("controller", "A device used to interact with video games."),
    ("vr", "Short for Virtual Reality."),
    ("neural", "Related to artificial intelligence and brain-like networks."),
    ("quantum", "A branch of physics dealing with subatomic particles."),
    ("blockchain", "A decentralized digital ledger technology."),
    ("encryption", "The process of converting data into a secure format."),
    ("robot", "A machine capable of carrying out complex tasks automatically."),
    ("keyboard", "An input device with keys for typing."),
    ("monitor", "A screen that displays computer output."),
    ("mouse", "A pointing device used with computers."),
    ("printer", "A device that produces physical copies of digital documents."),
    ("elephant", "The largest land animal."),
    ("giraffe", "A tall African mammal with a long neck."),
    ("dolphin", "A highly intelligent marine mammal."),
    ("volcano", "A mountain that erupts with lava and ash."),
    ("japan", "An island nation known for sushi and technology."),
    ("canada", "The second-largest country in the world by land area."),
    ("amazon", "The largest rainforest in the world."),
    ("everest", "The highest mountain on Earth."),
    ("pizza", "A popular Italian dish with toppings."),
    ("sushi", "A Japanese dish made with vinegared rice and seafood."),
    ("chocolate", "A sweet treat made from cocoa beans."),
    ("espresso", "A strong black coffee."),
    ("soccer", "The world's most popular sport, known as football outside the U.S."),
    ("basketball", "A game played with a hoop and a bouncing ball."),
    ("tennis", "A racket sport played on a rectangular court."),
    ("olympics", "An international multi-sport event held every four years."),
    ("stethoscope", "A device used to listen to heart and lung sounds."),
    ("diagnosis", "Identification of a disease or condition."),
    ("prognosis", "The likely course of a medical condition."),
    ("anatomy", "The study of body structures."),
    ("physiology", "The study of body functions."),
    ("pathology", "The study of disease causes and effects."),
    ("etiology", "The cause of a disease."),
    ("symptom", "A physical or mental feature indicating illness."),
    ("syndrome", "A group of symptoms that consistently occur together."),
    ("epidemic", "A widespread occurrence of an infectious disease."),
    ("pandemic", "A global outbreak of a disease."),
    ("antibiotic", "A drug used to treat bacterial infections."),
    ("antiviral", "A medication that fights viral infections."),
    ("analgesic", "A pain-relieving drug."),
    ("anesthesia", "Loss of sensation for medical procedures."),
    ("hemoglobin", "Protein in red blood cells that carries oxygen."),
    ("hypertension", "High blood pressure."),
    ("hypotension", "Abnormally low blood pressure."),
    ("tachycardia", "Abnormally rapid heart rate."),
    ("bradycardia", "Abnormally slow heart rate."),
    ("dialysis", "A procedure to filter blood when kidneys fail."),
    ("defibrillator", "A device that shocks the heart to restore rhythm."),
    ("intubation", "Inserting a tube into the airway for breathing."),
    ("suture", "A stitch used to close wounds."),
    ("fracture", "A broken bone."),
    ("concussion", "A traumatic brain injury from a blow to the head."),
    ("seizure", "Sudden, uncontrolled electrical brain disturbance."),
    ("immunity", "The body's ability to resist infection."),
    ("vaccine", "A substance that stimulates immunity to a disease."),
    ("sterile", "Free from bacteria or other microorganisms."),
    ("aseptic", "Techniques to prevent infection during procedures."),
    ("malignant", "A term for cancerous growths."),
    ("benign", "A non-cancerous growth."),
    ("metastasis", "The spread of cancer to other body parts."),
    ("chemotherapy", "Drug treatment for cancer."),
    ("radiology", "Medical imaging like X-rays and MRIs."),
    ("ultrasound", "Imaging using high-frequency sound waves."),
    ("biopsy", "Removal of tissue for diagnostic testing."),
    ("nurse", "A healthcare professional providing patient care."),
    ("patient", "A person receiving medical treatment."),
    ("vitals", "Measurements like pulse, temperature, and blood pressure."),
    ("catheter", "A tube inserted into the body to drain fluids."),
    ("bandage", "A strip of material used to cover wounds."),
    ("gauze", "A thin fabric used for dressing wounds."),
    ("injection", "Administering medication via a needle."),
    ("intravenous", "Delivering fluids or drugs directly into veins (IV)."),
    ("ambulatory", "Able to walk; not bedridden."),
    ("palliative", "Care focused on relieving symptoms, not curing."),
    ("rehabilitation", "Therapy to restore function after illness/injury."),
    ("geriatrics", "Medical care for elderly patients."),
    ("pediatrics", "Medical care for children."),
    ("neonatal", "Relating to newborn infants."),
    ("triage", "Prioritizing patients based on urgency."),
    ("codeblue", "A hospital emergency for cardiac/respiratory arrest."),
    ("diabetes", "A condition affecting blood sugar regulation."),
    ("asthma", "A chronic respiratory condition causing breathing difficulties."),
    ("arthritis", "Inflammation of the joints."),
    ("osteoporosis", "A condition causing weak, brittle bones."),
    ("alzheimer", "A progressive neurodegenerative disease."),
    ("pneumonia", "Infection inflaming the air sacs in the lungs."),
    ("appendicitis", "Inflammation of the appendix requiring surgery."),
    ("migraine", "A severe, recurring headache."),
    ("anemia", "A deficiency of red blood cells or hemoglobin."),
    ("jaundice", "Yellowing of the skin due to liver/bilirubin issues."),
    ("sepsis", "A life-threatening response to infection."),
    ("stroke", "A sudden interruption of blood flow to the brain."),
    ("epilepsy", "A neurological disorder causing recurrent seizures."),
    ("autism", "A developmental disorder affecting communication and behavior."),
    ("dementia", "A decline in cognitive function affecting memory."),
    ("obesity", "A medical condition involving excess body fat."),
    ("allergy", "An immune system reaction to a foreign substance."),
    ("influenza", "A contagious viral infection (the flu)."),
    ("tuberculosis", "A bacterial infection primarily affecting the lungs."),
    ("malaria", "A mosquito-borne infectious disease."),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessResult {
    AlreadyGuessed,
    Correct,
    Incorrect,
    /// The game had already ended; nothing changed.
    GameOver,
}

impl GuessResult {
    pub fn label(&self) -> &'static str {
        match self {
            GuessResult::AlreadyGuessed => "already guessed",
            GuessResult::Correct => "correct",
            GuessResult::Incorrect => "incorrect",
            GuessResult::GameOver => "game over",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HangmanGame {
    word: String,
    hint: String,
    attempts: u8,
    guessed: BTreeSet<char>,
    revealed: Vec<char>,
}

impl HangmanGame {
    pub fn new(word: &str, hint: &str) -> Self {
        let word = word.to_lowercase();
        HangmanGame {
            revealed: word.chars().map(|_| '_').collect(),
            word,
            hint: hint.to_string(),
            attempts: MAX_ATTEMPTS,
            guessed: BTreeSet::new(),
        }
    }

    pub fn random() -> Self {
        let (word, hint) = WORDS_WITH_HINTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(("hangman", "A classic word-guessing game."));
        Self::new(word, hint)
    }

    pub fn guess(&mut self, letter: char) -> GuessResult {
        if self.is_over() {
            return GuessResult::GameOver;
        }
        let letter = letter.to_ascii_lowercase();
        if !self.guessed.insert(letter) {
            return GuessResult::AlreadyGuessed;
        }

        let mut hit = false;
        for (slot, c) in self.revealed.iter_mut().zip(self.word.chars()) {
            if c == letter {
                *slot = c;
                hit = true;
            }
        }

        if hit {
            GuessResult::Correct
        } else {
            self.attempts = self.attempts.saturating_sub(1);
            GuessResult::Incorrect
        }
    }

    pub fn is_won(&self) -> bool {
        !self.revealed.contains(&'_')
    }

    pub fn is_lost(&self) -> bool {
        self.attempts == 0
    }

    pub fn is_over(&self) -> bool {
        self.is_won() || self.is_lost()
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    pub fn has_guessed(&self, letter: char) -> bool {
        self.guessed.contains(&letter.to_ascii_lowercase())
    }

    /// Revealed word with blanks, e.g. `p _ t h _ n`.
    pub fn display(&self) -> String {
        self.revealed
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn visual(&self) -> &'static str {
        GALLOWS[usize::from(MAX_ATTEMPTS - self.attempts)]
    }

    pub fn guessed_letters(&self) -> String {
        if self.guessed.is_empty() {
            "None".to_string()
        } else {
            self.guessed
                .iter()
                .map(char::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// What one menu press produced.
pub struct HangmanTurn {
    pub embed: CreateEmbed,
    pub components: CreateComponents,
    /// Set only on the press that ended the game: whether it was won.
    pub finished: Option<bool>,
}

/// A running hangman message and who started it.
pub struct HangmanView {
    pub game: HangmanGame,
    pub player_id: u64,
    pub guild_id: Option<u64>,
}

impl HangmanView {
    pub fn new(game: HangmanGame, player_id: u64, guild_id: Option<u64>) -> Self {
        HangmanView {
            game,
            player_id,
            guild_id,
        }
    }

    /// Applies a guess. Returns `None` once the game has ended, so the
    /// finishing press is reported exactly once.
    pub fn play(&mut self, letter: char) -> Option<HangmanTurn> {
        let result = self.game.guess(letter);
        if result == GuessResult::GameOver {
            return None;
        }
        let over = self.game.is_over();
        Some(HangmanTurn {
            embed: self.progress_embed(letter, result),
            components: self.components(over),
            finished: over.then(|| self.game.is_won()),
        })
    }

    pub fn start_embed(&self) -> CreateEmbed {
        let game = &self.game;
        let mut embed = CreateEmbed::default();
        embed
            .title("🎯 Hangman Game Started!")
            .description("Guess the word using the menus below.")
            .colour(BLURPLE)
            .field("Word", game.display(), false)
            .field("Attempts Left", game.attempts().to_string(), true)
            .field("Visual", format!("```{}```", game.visual()), false)
            .field("Hint", game.hint(), false);
        embed
    }

    pub fn progress_embed(&self, letter: char, result: GuessResult) -> CreateEmbed {
        let game = &self.game;
        let mut embed = CreateEmbed::default();
        embed
            .title("🎯 Hangman Game")
            .colour(PURPLE)
            .field("Word", game.display(), false)
            .field("Attempts Left", game.attempts().to_string(), true)
            .field("Visual", format!("```{}```", game.visual()), false)
            .field("Guessed Letters", game.guessed_letters(), true)
            .field("Hint", game.hint(), false)
            .footer(|f| f.text(format!("You guessed: '{}' ({})", letter, result.label())));

        if game.is_won() {
            embed
                .title("🎉 You Won!")
                .colour(GREEN)
                .footer(|f| f.text(format!("The word was: {}", game.word().to_uppercase())));
        } else if game.is_lost() {
            embed
                .title("💀 You Lost!")
                .colour(RED)
                .footer(|f| f.text(format!("The word was: {}", game.word().to_uppercase())));
        }

        embed
    }

    /// Letter menus; letters already tried are left out.
    pub fn components(&self, disabled: bool) -> CreateComponents {
        let halves = [
            (SELECT_FIRST_HALF, 'A'..='M'),
            (SELECT_SECOND_HALF, 'N'..='Z'),
        ];

        let mut components = CreateComponents::default();
        for (custom_id, range) in halves {
            let letters: Vec<char> = range.filter(|c| !self.game.has_guessed(*c)).collect();
            if letters.is_empty() {
                continue;
            }
            components.create_action_row(|row| {
                row.create_select_menu(|menu| {
                    menu.custom_id(custom_id)
                        .placeholder("Choose a letter...")
                        .min_values(1)
                        .max_values(1)
                        .disabled(disabled)
                        .options(|options| {
                            for letter in &letters {
                                options.create_option(|o| o.label(letter).value(letter));
                            }
                            options
                        })
                })
            });
        }
        components
    }
}

impl Expiring for HangmanView {
    fn timeout(&self) -> Duration {
        VIEW_TIMEOUT
    }

    fn on_timeout(&self) -> ViewTimeout {
        ViewTimeout {
            content: Some("⏰ Game timed out!".to_string()),
            embed: None,
            components: self.components(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::{field, footer, title};

    #[test]
    fn test_correct_guess_reveals_every_occurrence() {
        let mut game = HangmanGame::new("banana", "fruit");
        assert_eq!(game.guess('a'), GuessResult::Correct);
        assert_eq!(game.display(), "_ a _ a _ a");
        assert_eq!(game.attempts(), MAX_ATTEMPTS);
    }

    #[test]
    fn test_repeat_guess_is_a_no_op() {
        let mut game = HangmanGame::new("banana", "fruit");
        assert_eq!(game.guess('z'), GuessResult::Incorrect);
        assert_eq!(game.attempts(), 5);
        assert_eq!(game.guess('Z'), GuessResult::AlreadyGuessed);
        assert_eq!(game.attempts(), 5);
        assert_eq!(game.guess('a'), GuessResult::Correct);
        assert_eq!(game.guess('a'), GuessResult::AlreadyGuessed);
    }

    #[test]
    fn test_finished_game_ignores_guesses() {
        let mut game = HangmanGame::new("vr", "Short for Virtual Reality.");
        game.guess('v');
        game.guess('r');
        assert!(game.is_won());
        assert_eq!(game.guess('q'), GuessResult::GameOver);
        assert_eq!(game.attempts(), MAX_ATTEMPTS);
        assert!(!game.has_guessed('q'));

        let mut game = HangmanGame::new("vr", "Short for Virtual Reality.");
        for letter in ['a', 'b', 'c', 'd', 'e', 'f'] {
            game.guess(letter);
        }
        assert!(game.is_lost());
        assert_eq!(game.guess('v'), GuessResult::GameOver);
        assert_eq!(game.display(), "_ _");
    }

    #[test]
    fn test_win_and_loss() {
        let mut game = HangmanGame::new("vr", "Short for Virtual Reality.");
        game.guess('v');
        assert!(!game.is_won());
        game.guess('r');
        assert!(game.is_won());
        assert!(game.is_over());

        let mut game = HangmanGame::new("vr", "hint");
        for letter in ['a', 'b', 'c', 'd', 'e', 'f'] {
            assert!(!game.is_lost());
            game.guess(letter);
        }
        assert!(game.is_lost());
        assert_eq!(game.visual(), GALLOWS[6]);
    }

    #[test]
    fn test_guessed_letters_sorted() {
        let mut game = HangmanGame::new("python", "hint");
        assert_eq!(game.guessed_letters(), "None");
        game.guess('t');
        game.guess('a');
        game.guess('p');
        assert_eq!(game.guessed_letters(), "a, p, t");
    }

    #[test]
    fn test_word_list_is_lowercase_ascii() {
        for (word, hint) in WORDS_WITH_HINTS {
            assert!(word.chars().all(|c| c.is_ascii_lowercase()), "{}", word);
            assert!(!hint.is_empty());
        }
    }

    #[test]
    fn test_progress_embed_reports_result() {
        let mut view = HangmanView::new(HangmanGame::new("vr", "hint"), 1, None);
        let result = view.game.guess('x');
        let embed = view.progress_embed('x', result);
        assert_eq!(title(&embed), Some("🎯 Hangman Game"));
        assert_eq!(field(&embed, "Attempts Left"), Some("5"));
        assert_eq!(footer(&embed), Some("You guessed: 'x' (incorrect)"));

        view.game.guess('v');
        let result = view.game.guess('r');
        let embed = view.progress_embed('r', result);
        assert_eq!(title(&embed), Some("🎉 You Won!"));
        assert_eq!(footer(&embed), Some("The word was: VR"));
    }

    #[test]
    fn test_play_reports_the_finish_once() {
        let mut view = HangmanView::new(HangmanGame::new("vr", "hint"), 1, Some(2));
        assert_eq!(view.play('x').unwrap().finished, None);
        assert_eq!(view.play('v').unwrap().finished, None);
        assert_eq!(view.play('r').unwrap().finished, Some(true));
        assert!(view.play('q').is_none());
        assert!(view.play('z').is_none());
        assert_eq!(view.game.attempts(), 5);

        let mut view = HangmanView::new(HangmanGame::new("vr", "hint"), 1, None);
        let finishes = "abcdefgh"
            .chars()
            .filter_map(|c| view.play(c))
            .filter(|turn| turn.finished.is_some())
            .count();
        assert_eq!(finishes, 1);
        assert!(view.game.is_lost());
    }

    #[test]
    fn test_components_drop_guessed_letters() {
        let mut view = HangmanView::new(HangmanGame::new("vr", "hint"), 1, None);
        view.game.guess('a');
        let components = view.components(false);
        let rendered = serde_json::to_string(&components.0).unwrap();
        assert!(!rendered.contains("\"value\":\"A\""));
        assert!(rendered.contains("\"value\":\"B\""));
        assert!(rendered.contains(SELECT_SECOND_HALF));
    }
}
