//! The fixed ENEM rubric embedded into the evaluation prompt.
//!
//! Five competencies, each scored on the six official bands
//! (0/40/80/120/160/200). The rubric text is deliberately kept in
//! Portuguese: it is what the evaluator model reads.

/// The official score bands for one competency.
pub const SCORE_BANDS: [i32; 6] = [0, 40, 80, 120, 160, 200];

/// Detailed evaluation criteria for the five ENEM competencies.
pub const ENEM_CRITERIA: &str = "\
COMPETÊNCIA 1 (0-200 pontos): Demonstrar domínio da modalidade escrita formal da língua portuguesa
- Ortografia e acentuação corretas
- Pontuação adequada
- Concordância verbal e nominal
- Regência verbal e nominal
- Uso apropriado de conectivos
- Ausência de marcas de oralidade
- Vocabulário adequado ao registro formal

COMPETÊNCIA 2 (0-200 pontos): Compreender a proposta de redação e aplicar conceitos das várias áreas de conhecimento
- Compreensão completa do tema proposto
- Desenvolvimento do tema sem tangenciá-lo
- Repertório sociocultural produtivo (referências, dados, citações)
- Argumentação consistente e bem fundamentada
- Articulação entre tema e conhecimentos de diferentes áreas

COMPETÊNCIA 3 (0-200 pontos): Selecionar, relacionar, organizar e interpretar informações, fatos, opiniões e argumentos
- Organização clara das ideias
- Coerência argumentativa
- Progressão textual lógica
- Relação adequada entre informações, fatos e opiniões
- Defesa consistente de um ponto de vista
- Estrutura dissertativo-argumentativa bem definida

COMPETÊNCIA 4 (0-200 pontos): Demonstrar conhecimento dos mecanismos linguísticos necessários para a construção da argumentação
- Uso adequado de conectivos e operadores argumentativos
- Coesão referencial (pronomes, sinônimos, hiperônimos)
- Coesão sequencial (progressão temática)
- Articulação eficiente entre parágrafos
- Encadeamento lógico das ideias
- Ausência de repetições desnecessárias

COMPETÊNCIA 5 (0-200 pontos): Elaborar proposta de intervenção para o problema abordado
- Proposta de intervenção clara e detalhada
- Respeito aos direitos humanos
- Presença dos 5 elementos: agente, ação, modo/meio, finalidade, detalhamento
- Relação direta com o tema e a argumentação desenvolvida
- Viabilidade e especificidade da proposta

NÍVEIS DE PONTUAÇÃO POR COMPETÊNCIA:
- 200 pontos: Excelente domínio
- 160 pontos: Bom domínio
- 120 pontos: Domínio mediano
- 80 pontos: Domínio insuficiente
- 40 pontos: Domínio precário
- 0 pontos: Desclassificação ou ausência total
";

/// Builds the rubric evaluation prompt for one transcription.
pub fn evaluation_prompt(transcription: &str) -> String {
    format!(
        r#"Você é um avaliador especializado em redações do ENEM (Exame Nacional do Ensino Médio).
Sua tarefa é avaliar a seguinte redação segundo as 5 competências do ENEM, fornecendo uma pontuação de 0 a 200 para cada competência e feedback detalhado.

CRITÉRIOS DE AVALIAÇÃO:
{ENEM_CRITERIA}

REDAÇÃO A SER AVALIADA:
"""
{transcription}
"""

INSTRUÇÕES:
1. Avalie cuidadosamente cada competência
2. Atribua uma pontuação de 0 a 200 para cada competência (use apenas valores: 0, 40, 80, 120, 160, 200)
3. Forneça feedback específico e construtivo para cada competência
4. Identifique pontos fortes e áreas de melhoria
5. No feedback geral, resuma a avaliação e dê orientações para melhorar

Retorne APENAS um JSON válido no seguinte formato (sem markdown, sem ```json):
{{
  "competency_1": {{
    "score": 160,
    "feedback": "Feedback detalhado sobre domínio da língua portuguesa..."
  }},
  "competency_2": {{
    "score": 160,
    "feedback": "Feedback detalhado sobre compreensão do tema..."
  }},
  "competency_3": {{
    "score": 160,
    "feedback": "Feedback detalhado sobre organização de informações..."
  }},
  "competency_4": {{
    "score": 160,
    "feedback": "Feedback detalhado sobre mecanismos linguísticos..."
  }},
  "competency_5": {{
    "score": 160,
    "feedback": "Feedback detalhado sobre proposta de intervenção..."
  }},
  "general_feedback": "Feedback geral sobre a redação..."
}}"#
    )
}

/// Builds the OCR reconstruction prompt.
pub fn reconstruction_prompt(raw_text: &str) -> String {
    format!(
        r#"O texto a seguir foi extraído por OCR de uma redação manuscrita em português e contém ruídos típicos: espaçamento incorreto, palavras quebradas, acentuação perdida e caracteres trocados.

Reconstrua o texto corrigindo apenas esses ruídos de OCR. NÃO altere o conteúdo, o estilo nem a argumentação do autor. NÃO corrija erros gramaticais ou ortográficos que pareçam genuínos do manuscrito. Preserve a divisão em parágrafos.

TEXTO EXTRAÍDO:
"""
{raw_text}
"""

Retorne APENAS o texto reconstruído, sem comentários ou formatação adicional."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bands_are_the_official_six() {
        assert_eq!(SCORE_BANDS, [0, 40, 80, 120, 160, 200]);
        assert_eq!(SCORE_BANDS.iter().sum::<i32>(), 600);
    }

    #[test]
    fn test_evaluation_prompt_embeds_rubric_and_essay() {
        let prompt = evaluation_prompt("O Brasil enfrenta desafios na educação.");
        assert!(prompt.contains("COMPETÊNCIA 1"));
        assert!(prompt.contains("COMPETÊNCIA 5"));
        assert!(prompt.contains("O Brasil enfrenta desafios na educação."));
        assert!(prompt.contains("competency_5"));
        assert!(prompt.contains("general_feedback"));
    }

    #[test]
    fn test_reconstruction_prompt_embeds_raw_text() {
        let prompt = reconstruction_prompt("texto qu ebr ado");
        assert!(prompt.contains("texto qu ebr ado"));
        assert!(prompt.contains("reconstruído"));
    }
}
