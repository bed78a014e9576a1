//! Question bank for the trivia game, as (question, answer) pairs.
//! Answers are lowercase and compared after trimming.

pub const TRIVIA_QUESTIONS: &[(&str, &str)] = &[
    ("What is the capital of Australia?", "canberra"),
    ("Who painted the Mona Lisa?", "leonardo da vinci"),
    ("In which year did the Titanic sink?", "1912"),
    ("What is the largest planet in our solar system?", "jupiter"),
    ("Which element has the chemical symbol 'O'?", "oxygen"),
    ("Who wrote the Harry Potter series?", "j.k. rowling"),
    ("How many continents are there?", "7"),
    ("What is the currency of Japan?", "yen"),
    ("What’s the capital city of Canada?", "ottawa"),
    ("What is the rarest blood type?", "ab negative"),
    ("Who discovered penicillin?", "alexander fleming"),
    ("What is the smallest country in the world?", "vatican city"),
    ("In which year did World War II end?", "1945"),
    ("What is the main ingredient in guacamole?", "avocado"),
    ("Who was the first person to walk on the moon?", "neil armstrong"),
    ("What is the hardest natural substance on Earth?", "diamond"),
    ("Which planet is known as the Red Planet?", "mars"),
    ("What is the largest mammal in the world?", "blue whale"),
    ("Who wrote 'Romeo and Juliet'?", "william shakespeare"),
    ("What is the boiling point of water?", "100 degrees celsius"),
    ("What is the capital of France?", "paris"),
    ("What is the capital of Australia?", "canberra"),
    ("Who painted the Mona Lisa?", "leonardo da vinci"),
    ("What is the capital of Brazil?", "brasília"),
    ("Who invented the telephone?", "alexander graham bell"),
    ("What is the square root of 64?", "8"),
    ("Which planet has the most moons?", "jupiter"),
    ("What is the currency of South Korea?", "won"),
    ("Who wrote 'The Odyssey'?", "homer"),
    ("What is the atomic number of carbon?", "6"),
    ("Which country gifted the Statue of Liberty to the US?", "france"),
    ("What is the largest desert in the world?", "antarctica"),
    ("How many players are on a baseball team?", "9"),
    ("What is the capital of Egypt?", "cairo"),
    ("Who is the Greek god of the sea?", "poseidon"),
    ("What is the longest river in Africa?", "nile"),
    ("In which country would you find the Taj Mahal?", "india"),
    ("What is the chemical symbol for silver?", "ag"),
    ("What year did the Berlin Wall fall?", "1989"),
    ("Who discovered gravity?", "isaac newton"),
    ("What is the capital of New Zealand?", "wellington"),
    ("Which country is known as the 'Land of the Rising Sun'?", "japan"),
    ("What is the capital of South Africa?", "pretoria"),
    ("Which river flows through Paris?", "seine"),
    ("Mount Everest is located in which mountain range?", "himalayas"),
    ("What is the largest ocean on Earth?", "pacific"),
    ("Which desert covers most of northern Africa?", "sahara"),
    ("What is the capital of Iceland?", "reykjavik"),
    ("Which country has the most time zones?", "france"),
    ("What is the smallest US state by area?", "rhode island"),
    ("Which continent is the driest inhabited continent?", "australia"),
    ("What is the chemical symbol for gold?", "au"),
    ("How many bones are in the adult human body?", "206"),
    ("Which gas do plants absorb from the atmosphere?", "carbon dioxide"),
    ("What is the fastest land animal?", "cheetah"),
    ("Which planet is closest to the Sun?", "mercury"),
    ("What is the largest organ in the human body?", "skin"),
    ("Which blood type is the universal donor?", "o negative"),
    ("What is the study of fossils called?", "paleontology"),
    ("Which animal has the longest lifespan?", "greenland shark"),
    ("What is the main gas in the Earth's atmosphere?", "nitrogen"),
    ("Who was the first President of the United States?", "george washington"),
    ("In which year did the Berlin Wall fall?", "1989"),
    ("Which ancient civilization built the pyramids?", "egyptians"),
    ("Who was the first woman to win a Nobel Prize?", "marie curie"),
    ("What was the name of the ship Charles Darwin sailed on?", "hms beagle"),
    ("Which empire was ruled by Genghis Khan?", "mongol empire"),
    ("Who invented the light bulb?", "thomas edison"),
    ("What year did World War I begin?", "1914"),
    ("Which ancient city was destroyed by Mount Vesuvius?", "pompeii"),
    ("Who wrote the 'I Have a Dream' speech?", "martin luther king jr"),
    ("Who played Jack in 'Titanic'?", "leonardo dicaprio"),
    ("Which band wrote the song 'Bohemian Rhapsody'?", "queen"),
    ("What is the highest-grossing film of all time?", "avatar"),
    ("Who is known as the 'Queen of Pop'?", "madonna"),
    ("Which TV show features the characters Ross and Rachel?", "friends"),
    ("What is the name of the wizard school in Harry Potter?", "hogwarts"),
    ("Who painted 'Starry Night'?", "vincent van gogh"),
    ("Which rapper's real name is Marshall Mathers?", "eminem"),
    ("What is the capital of Westeros in 'Game of Thrones'?", "king's landing"),
    ("Who directed the movie 'Jurassic Park'?", "steven spielberg"),
    ("Which country won the 2018 FIFA World Cup?", "france"),
    ("How many players are on a basketball court at once?", "10"),
    ("Who holds the record for most Olympic gold medals?", "michael phelps"),
    ("In which sport is the Stanley Cup awarded?", "ice hockey"),
    ("What is the national sport of Japan?", "sumo wrestling"),
    ("Which tennis player has the most Grand Slam titles?", "novak djokovic"),
    ("How many rings are on the Olympic flag?", "5"),
    ("Which country invented cricket?", "england"),
    ("What is the diameter of a basketball hoop in inches?", "18"),
    ("Who is the all-time leading scorer in NBA history?", "lebron james"),
    ("What is the capital of Australia?", "canberra"),
    ("Which country is known as the 'Land of the Rising Sun'?", "japan"),
    ("What is the longest river in the world?", "nile"),
    ("What is the chemical symbol for gold?", "au"),
    ("How many bones are in the adult human body?", "206"),
    ("What is the fastest land animal?", "cheetah"),
    ("Who was the first President of the United States?", "george washington"),
    ("Which ancient civilization built the pyramids?", "egyptians"),
    ("What year did World War I begin?", "1914"),
    ("Who played Jack in 'Titanic'?", "leonardo dicaprio"),
    ("Which band wrote 'Bohemian Rhapsody'?", "queen"),
    ("What is the highest-grossing film of all time?", "avatar"),
    ("Which country won the 2018 FIFA World Cup?", "france"),
    ("How many players are on a basketball court at once?", "10"),
    ("Who holds the record for most Olympic gold medals?", "michael phelps"),
    ("What does 'CPU' stand for?", "central processing unit"),
    ("Which company created the iPhone?", "apple"),
    ("What year was Facebook launched?", "2004"),
    ("What is the main ingredient in hummus?", "chickpeas"),
    ("Which country produces the most coffee?", "brazil"),
    ("What is the national dish of Spain?", "paella"),
    ("What is the only mammal capable of true flight?", "bat"),
    ("How many hearts does an octopus have?", "3"),
    ("Which bird has the largest wingspan?", "albatross"),
    ("How many dots are on a standard die?", "21"),
    ("What is the most common letter in English?", "e"),
    ("How many US states start with 'M'?", "8"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_are_normalised() {
        assert!(TRIVIA_QUESTIONS.len() >= 100);
        for (question, answer) in TRIVIA_QUESTIONS {
            assert!(!question.is_empty());
            assert_eq!(*answer, answer.trim().to_lowercase(), "{}", question);
        }
    }
}
