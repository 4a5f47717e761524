// src/services/importacao_service.rs

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    common::error::AppError,
    db::LojasRepository,
    models::{Estado, LinhaImportacao, PopupTipo, Sessao, SLUG_RE},
};

/// Erros de uma linha da planilha, identificada pelo número dela no arquivo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErroLinha {
    pub linha: usize,
    /// Slug da linha, ou "Linha N" quando a própria linha não tem slug.
    pub slug: String,
    pub erros: Vec<String>,
}

/// Resultado da validação da planilha inteira, antes de qualquer gravação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoValidacao {
    pub valido: bool,
    /// Erro que invalida o arquivo por inteiro (ex.: planilha sem dados).
    pub erro_geral: Option<String>,
    pub erros: Vec<ErroLinha>,
}

/// Falha pontual de uma linha durante a importação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErroImportacao {
    pub slug: String,
    pub erro: String,
}

/// Agregado da importação: quantas linhas viraram loja e quantas falharam.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoImportacao {
    pub sucesso: usize,
    pub falhas: usize,
    pub erros: Vec<ErroImportacao>,
}

/// Desfecho do fluxo completo de importação de um arquivo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SaidaImportacao {
    /// O arquivo não passou do parse ou da validação; nada foi gravado.
    Rejeitada {
        mensagem: String,
        validacao: Option<ResultadoValidacao>,
    },
    /// A validação passou e cada linha foi tentada individualmente.
    Concluida { resultados: ResultadoImportacao },
}

fn celula(valor: &Option<String>) -> Option<&str> {
    valor.as_deref().filter(|texto| !texto.trim().is_empty())
}

/// Converte o conteúdo de um arquivo CSV em linhas de importação. A primeira
/// linha é o cabeçalho; linhas em branco são ignoradas; células são aparadas
/// e célula vazia vira `None`. Linha mais curta que o cabeçalho é aceita
/// (os campos finais ficam ausentes), porque as planilhas reais costumam
/// omitir as colunas opcionais.
pub fn processar_csv(conteudo: &[u8]) -> Result<Vec<LinhaImportacao>, AppError> {
    let mut leitor = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(conteudo);

    let mut linhas = Vec::new();
    for registro in leitor.deserialize() {
        let linha: LinhaImportacao = registro?;
        linhas.push(linha);
    }

    Ok(linhas)
}

/// Valida a planilha inteira numa passada só, sem curto-circuito: o operador
/// recebe todos os problemas de uma vez e corrige o arquivo uma única vez.
/// Nenhuma linha é gravada enquanto houver qualquer erro.
pub fn validar_dados_importacao(linhas: &[LinhaImportacao]) -> ResultadoValidacao {
    if linhas.is_empty() {
        return ResultadoValidacao {
            valido: false,
            erro_geral: Some("O arquivo não contém dados para importação".to_string()),
            erros: Vec::new(),
        };
    }

    let mut erros = Vec::new();

    for (indice, linha) in linhas.iter().enumerate() {
        // +2: o índice começa em zero e a linha 1 do arquivo é o cabeçalho.
        let numero = indice + 2;
        let mut mensagens = Vec::new();

        for (campo, valor) in [
            ("slug", &linha.slug),
            ("cidade", &linha.cidade),
            ("estado", &linha.estado),
            ("telefone", &linha.telefone),
            ("preco_inicial", &linha.preco_inicial),
        ] {
            if celula(valor).is_none() {
                mensagens.push(format!("Campo \"{campo}\" ausente ou vazio"));
            }
        }

        // O formato é conferido sobre o slug minúsculo, porque é assim que
        // ele será gravado.
        if let Some(slug) = celula(&linha.slug) {
            if !SLUG_RE.is_match(&slug.to_lowercase()) {
                mensagens.push(
                    "O slug deve conter apenas letras minúsculas, números e hífen".to_string(),
                );
            }
        }

        if let Some(estado) = celula(&linha.estado) {
            if Estado::parse(estado).is_none() {
                mensagens.push("O estado deve ser PR ou SP".to_string());
            }
        }

        if let Some(popup) = celula(&linha.popup_tipo) {
            if PopupTipo::parse(popup).is_none() {
                mensagens.push(
                    "O tipo de popup deve ser: whatsapp, raspadinha ou simples".to_string(),
                );
            }
        }

        if let Some(preco) = celula(&linha.preco_inicial) {
            match Decimal::from_str(preco.trim()) {
                Ok(valor) if !valor.is_sign_negative() => {}
                _ => mensagens
                    .push("O preço inicial deve ser um número não negativo".to_string()),
            }
        }

        if !mensagens.is_empty() {
            erros.push(ErroLinha {
                linha: numero,
                slug: linha
                    .slug
                    .clone()
                    .unwrap_or_else(|| format!("Linha {numero}")),
                erros: mensagens,
            });
        }
    }

    ResultadoValidacao {
        valido: erros.is_empty(),
        erro_geral: None,
        erros,
    }
}

/// Planilha modelo oferecida para download na tela de importação. O campo
/// com vírgula vai entre aspas para o CSV continuar bem formado.
pub fn gerar_planilha_modelo() -> String {
    [
        "slug,cidade,estado,telefone,preco_inicial,link_whatsapp,link_maps,popup_tipo,meta_title,meta_description",
        r#"londrina,Londrina,PR,(43) 3333-3333,289,https://wa.me/5543999999999,https://goo.gl/maps/exemplo1,whatsapp,Baterias em Londrina | Rede Única de Baterias,"Encontre as melhores baterias em Londrina. Preços a partir de R$ 289,00.""#,
        "maringa,Maringá,PR,(44) 4444-4444,299,https://wa.me/5544999999999,https://goo.gl/maps/exemplo2,raspadinha,Baterias em Maringá | Rede Única de Baterias,Baterias automotivas com os melhores preços em Maringá.",
    ]
    .join("\n")
}

enum ResultadoLinha {
    Criada,
    Duplicada,
}

#[derive(Clone)]
pub struct ImportacaoService {
    lojas: LojasRepository,
}

impl ImportacaoService {
    pub fn new(lojas: LojasRepository) -> Self {
        Self { lojas }
    }

    /// Fluxo completo: parse, validação e importação linha a linha. Arquivo
    /// malformado ou inválido é rejeitado sem gravar nada; depois disso cada
    /// linha segue por conta própria.
    pub async fn importar_csv(
        &self,
        conteudo: &[u8],
        marca_id: &str,
        sessao: &Sessao,
    ) -> SaidaImportacao {
        let linhas = match processar_csv(conteudo) {
            Ok(linhas) => linhas,
            Err(erro) => {
                return SaidaImportacao::Rejeitada {
                    mensagem: format!("Erro na importação: {erro}"),
                    validacao: None,
                };
            }
        };

        let validacao = validar_dados_importacao(&linhas);
        if !validacao.valido {
            return SaidaImportacao::Rejeitada {
                mensagem: "Existem erros nos dados que impedem a importação".to_string(),
                validacao: Some(validacao),
            };
        }

        SaidaImportacao::Concluida {
            resultados: self.importar_lojas(&linhas, marca_id, sessao).await,
        }
    }

    /// Importa as linhas já validadas, uma a uma. Slug repetido dentro da
    /// marca e falha de gravação derrubam só a própria linha; o agregado
    /// sempre volta inteiro, nunca como erro.
    pub async fn importar_lojas(
        &self,
        linhas: &[LinhaImportacao],
        marca_id: &str,
        sessao: &Sessao,
    ) -> ResultadoImportacao {
        let mut resultados = ResultadoImportacao::default();

        for linha in linhas {
            let identificador = linha.slug.clone().unwrap_or_default();

            match self.importar_linha(linha, marca_id).await {
                Ok(ResultadoLinha::Criada) => resultados.sucesso += 1,
                Ok(ResultadoLinha::Duplicada) => {
                    resultados.falhas += 1;
                    resultados.erros.push(ErroImportacao {
                        slug: identificador,
                        erro: "Já existe uma loja com este slug nesta marca".to_string(),
                    });
                }
                Err(erro) => {
                    resultados.falhas += 1;
                    resultados.erros.push(ErroImportacao {
                        slug: identificador,
                        erro: erro.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "📦 Importação para a marca {}: {} criada(s), {} falha(s) (por {})",
            marca_id,
            resultados.sucesso,
            resultados.falhas,
            sessao.email
        );

        resultados
    }

    async fn importar_linha(
        &self,
        linha: &LinhaImportacao,
        marca_id: &str,
    ) -> Result<ResultadoLinha, AppError> {
        let slug = linha
            .slug
            .as_deref()
            .ok_or_else(|| AppError::DadosInvalidos("linha de planilha sem slug".into()))?;

        let duplicada = self
            .lojas
            .verificar_slug_existente(slug, marca_id, None)
            .await?;

        if duplicada {
            return Ok(ResultadoLinha::Duplicada);
        }

        self.lojas.criar_importada(linha, marca_id).await?;
        Ok(ResultadoLinha::Criada)
    }
}
